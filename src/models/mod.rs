pub mod booking;
pub mod chat;
