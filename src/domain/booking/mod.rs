pub mod model;
pub mod repository;

pub use model::{Booking, BookingStatus, SlotKey, SlotOwner};
pub use repository::BookingRepository;
