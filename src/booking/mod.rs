use log::info;
use std::error::Error;
use thiserror::Error;
use url::form_urlencoded;
use crate::i18n::{ self, Lang, MessageKey };
use crate::models::booking::BookingRequest;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("missing required field: {0}")] MissingField(&'static str),
    #[error("invalid phone number: {0}")] InvalidPhone(String),
}

impl BookingError {
    /// Localized message for the form, mirroring the per-field errors the
    /// site shows inline.
    pub fn localized(&self, lang: Lang) -> String {
        match self {
            BookingError::MissingField(field) =>
                i18n::message(MessageKey::BookingMissingField, lang).replace("{field}", field),
            BookingError::InvalidPhone(_) =>
                i18n::message(MessageKey::BookingInvalidPhone, lang).to_string(),
        }
    }
}

/// Accepts digits with an optional leading `+`; spaces and dashes are
/// tolerated as separators. 9 to 15 digits covers local and international
/// formats.
pub fn is_valid_phone(contact: &str) -> bool {
    let trimmed = contact.trim();
    let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-') {
        return false;
    }
    let digits = rest.chars().filter(|c| c.is_ascii_digit()).count();
    (9..=15).contains(&digits)
}

pub fn validate(req: &BookingRequest) -> Result<(), BookingError> {
    if req.name.trim().is_empty() {
        return Err(BookingError::MissingField("name"));
    }
    if req.vehicle.trim().is_empty() {
        return Err(BookingError::MissingField("vehicle"));
    }
    if req.contact.trim().is_empty() {
        return Err(BookingError::MissingField("contact"));
    }
    if !is_valid_phone(&req.contact) {
        return Err(BookingError::InvalidPhone(req.contact.clone()));
    }
    if req.start_date.trim().is_empty() {
        return Err(BookingError::MissingField("start_date"));
    }
    if req.end_date.trim().is_empty() {
        return Err(BookingError::MissingField("end_date"));
    }
    if req.destination.trim().is_empty() {
        return Err(BookingError::MissingField("destination"));
    }
    Ok(())
}

/// `Rp 1.200.000` style grouping with dots.
pub fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, c) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("Rp {}", grouped)
}

/// Builds the prefilled WhatsApp deep link for the booking handoff. Pure
/// string templating, no network call.
pub fn whatsapp_link(number: &str, req: &BookingRequest, lang: Lang) -> String {
    let message = i18n
        ::message(MessageKey::BookingTemplate, lang)
        .replace("{name}", &req.name)
        .replace("{vehicle}", &req.vehicle)
        .replace("{contact}", &req.contact)
        .replace("{start}", &req.start_date)
        .replace("{end}", &req.end_date)
        .replace("{destination}", &req.destination)
        .replace("{price}", &format_rupiah(req.price_per_day));

    let digits: String = number
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let encoded: String = form_urlencoded::byte_serialize(message.as_bytes()).collect();
    format!("https://wa.me/{}?text={}", digits, encoded)
}

/// Best-effort persistence of the lead. The caller may ignore the result;
/// the WhatsApp handoff proceeds either way.
pub async fn persist(
    http: &reqwest::Client,
    endpoint: &str,
    req: &BookingRequest
) -> Result<(), Box<dyn Error + Send + Sync>> {
    http.post(endpoint).json(req).send().await?.error_for_status()?;
    info!("Booking for '{}' persisted to {}", req.name, endpoint);
    Ok(())
}
