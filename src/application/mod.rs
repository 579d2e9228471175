pub mod identity;
pub mod ports;
pub mod reservations;
pub mod services;

// Re-export key types for convenience
pub use identity::{AuthResult, UserService};
pub use ports::{NotificationError, ReservationConfirmation, ReservationNotifier};
pub use reservations::{ReservationInput, ReservationService};
pub use services::{HotelDetails, HotelSearch, HotelService, RoomService};
