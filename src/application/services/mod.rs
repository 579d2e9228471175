//! Application services

mod hotel;
mod room;

pub use hotel::{HotelDetails, HotelSearch, HotelService};
pub use room::RoomService;
