pub mod hotel;
pub mod repositories;
pub mod reservation;
pub mod room;
pub mod user;

// Re-export commonly used types
pub use hotel::{Hotel, HotelDraft, HotelRepository};
pub use repositories::{DomainResult, RepositoryProvider};
pub use reservation::{
    DocumentType, Gender, Guest, Reservation, ReservationRecord, ReservationRepository, StayPeriod,
};
pub use room::{Room, RoomDraft, RoomRepository};
pub use user::{CreateUserDto, User, UserRepository, UserRole};

pub use crate::shared::errors::DomainError;
