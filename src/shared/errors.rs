use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Room {0} not found")]
    RoomNotFound(i32),

    #[error("Room {0} is not available for booking")]
    RoomUnavailable(i32),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Room capacity exceeded: {guests} guests for a room of {capacity}")]
    CapacityExceeded { guests: usize, capacity: u32 },

    #[error("Invalid guest data: {0}")]
    InvalidGuestData(String),

    #[error("Room {room_id} is already booked between {check_in} and {check_out}")]
    DateConflict {
        room_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Reservation {0} not found")]
    ReservationNotFound(i32),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Storage(_))
    }
}
