use serde::{ Serialize, Deserialize };

/// A unit in the rental fleet, loaded from the fleet catalog file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub price_per_day: u64,
}

/// The fields the booking form submits before the WhatsApp handoff.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookingRequest {
    pub name: String,
    pub vehicle: String,
    pub contact: String,
    pub start_date: String,
    pub end_date: String,
    pub destination: String,
    pub price_per_day: u64,
}
