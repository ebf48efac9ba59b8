pub mod bookings;
pub mod connection;
pub mod listings;
pub mod seed;

pub use connection::Database;
