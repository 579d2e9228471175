//! Reservation aggregate
//!
//! Contains the Reservation entity, its guests, the stay period rules and
//! the repository interface.

pub mod model;
pub mod repository;

pub use model::{
    dates_overlap, validate_guests, DocumentType, Gender, Guest, Reservation, ReservationRecord,
    StayPeriod,
};
pub use repository::ReservationRepository;
