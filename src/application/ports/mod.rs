//! Application ports (hexagonal architecture boundaries)
//!
//! Repository ports live in `domain`; outbound ports that only the
//! application layer drives live here.

pub mod notifier;

pub use notifier::{NotificationError, ReservationConfirmation, ReservationNotifier};
