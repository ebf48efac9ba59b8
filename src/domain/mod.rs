pub mod booking;
pub mod booking_id;
pub mod listing;
pub mod validation;
