//! Reservation use-cases

pub mod service;

pub use service::{ReservationInput, ReservationService};
