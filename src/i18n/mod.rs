use once_cell::sync::Lazy;
use serde::{ Deserialize, Serialize };
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

/// Language tags the site serves. The widget only ever sends "id" or "en";
/// anything else falls back to the process default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Id,
    En,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::Id => "id",
            Lang::En => "en",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseLangError {
    message: String,
}

impl fmt::Display for ParseLangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseLangError {}

impl FromStr for Lang {
    type Err = ParseLangError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "id" | "id-id" => Ok(Lang::Id),
            "en" | "en-us" | "en-gb" => Ok(Lang::En),
            _ =>
                Err(ParseLangError {
                    message: format!("Unsupported language tag: '{}'", s),
                }),
        }
    }
}

static DEFAULT_LANG: Lazy<RwLock<Lang>> = Lazy::new(|| RwLock::new(Lang::Id));

/// Sets the process-wide default locale once at startup.
pub fn init_default_lang(lang: Lang) {
    set_default_lang(lang);
}

/// Explicit setter for the default locale; the only place the global mutates.
pub fn set_default_lang(lang: Lang) {
    if let Ok(mut guard) = DEFAULT_LANG.write() {
        *guard = lang;
    }
}

pub fn default_lang() -> Lang {
    DEFAULT_LANG.read().map(|guard| *guard).unwrap_or(Lang::Id)
}

/// Resolves an optional client-supplied tag, falling back to the default locale.
pub fn resolve_lang(tag: Option<&str>) -> Lang {
    tag.and_then(|s| s.parse().ok()).unwrap_or_else(default_lang)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    ChatWelcome,
    ChatEmptyMessage,
    NoAnswerApology,
    GenericErrorApology,
    BookingTemplate,
    BookingInvalidPhone,
    BookingMissingField,
}

/// Static resource bundle keyed by (message key, language). Placeholders in
/// braces are substituted by the caller.
pub fn message(key: MessageKey, lang: Lang) -> &'static str {
    match (key, lang) {
        (MessageKey::ChatWelcome, Lang::Id) =>
            "Halo! Saya asisten virtual Morfosa Transport. Ada yang bisa saya bantu tentang layanan sewa mobil kami?",
        (MessageKey::ChatWelcome, Lang::En) =>
            "Hello! I'm Morfosa Transport's virtual assistant. Is there anything I can help you with regarding our car rental services?",
        (MessageKey::ChatEmptyMessage, Lang::Id) => "Pesan tidak boleh kosong.",
        (MessageKey::ChatEmptyMessage, Lang::En) => "Message must not be empty.",
        (MessageKey::NoAnswerApology, Lang::Id) =>
            "Maaf, saya tidak menemukan jawaban untuk pertanyaan Anda. Silakan hubungi customer service kami di WhatsApp {whatsapp} untuk bantuan lebih lanjut.",
        (MessageKey::NoAnswerApology, Lang::En) =>
            "Sorry, I couldn't find an answer to your question. Please contact our customer service on WhatsApp {whatsapp} for further assistance.",
        (MessageKey::GenericErrorApology, Lang::Id) =>
            "Maaf, terjadi kesalahan. Silakan coba lagi atau hubungi WhatsApp kami di {whatsapp}.",
        (MessageKey::GenericErrorApology, Lang::En) =>
            "Sorry, an error occurred. Please try again or contact our WhatsApp at {whatsapp}.",
        (MessageKey::BookingTemplate, Lang::Id) =>
            "Halo, saya ingin memesan unit:\n\nNama: {name}\nUnit: {vehicle}\nNo. Kontak: {contact}\nTanggal sewa: {start}\nTanggal selesai: {end}\nTujuan: {destination}\nHarga paket: {price}/hari\n\n\u{26a0}\u{fe0f} Terdapat harga tambahan untuk di luar kota.",
        (MessageKey::BookingTemplate, Lang::En) =>
            "Hello, I would like to book a vehicle:\n\nName: {name}\nVehicle: {vehicle}\nContact: {contact}\nStart date: {start}\nEnd date: {end}\nDestination: {destination}\nPackage price: {price}/day\n\n\u{26a0}\u{fe0f} Additional cost for out-of-town trips.",
        (MessageKey::BookingInvalidPhone, Lang::Id) => "Format nomor telepon tidak valid",
        (MessageKey::BookingInvalidPhone, Lang::En) => "Invalid phone number format",
        (MessageKey::BookingMissingField, Lang::Id) => "Kolom {field} harus diisi",
        (MessageKey::BookingMissingField, Lang::En) => "Field {field} is required",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_tags() {
        assert_eq!("id".parse::<Lang>(), Ok(Lang::Id));
        assert_eq!("EN".parse::<Lang>(), Ok(Lang::En));
        assert_eq!("en-US".parse::<Lang>(), Ok(Lang::En));
        assert!("fr".parse::<Lang>().is_err());
    }

    #[test]
    fn unknown_tag_falls_back_to_default() {
        assert_eq!(resolve_lang(Some("fr")), default_lang());
        assert_eq!(resolve_lang(None), default_lang());
        assert_eq!(resolve_lang(Some("en")), Lang::En);
    }

    #[test]
    fn every_key_has_both_languages() {
        let keys = [
            MessageKey::ChatWelcome,
            MessageKey::ChatEmptyMessage,
            MessageKey::NoAnswerApology,
            MessageKey::GenericErrorApology,
            MessageKey::BookingTemplate,
            MessageKey::BookingInvalidPhone,
            MessageKey::BookingMissingField,
        ];
        for key in keys {
            assert!(!message(key, Lang::Id).is_empty());
            assert!(!message(key, Lang::En).is_empty());
        }
    }
}
