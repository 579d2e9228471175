//! Outbound notification port
//!
//! Reservation flows depend on [`ReservationNotifier`] only. Delivery is
//! best-effort: callers log a [`NotificationError`] and carry on.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Everything a booking confirmation needs to say
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationConfirmation {
    pub email: String,
    pub guest_full_name: String,
    pub hotel_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: Decimal,
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    #[error("Notification I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait ReservationNotifier: Send + Sync {
    async fn send_reservation_confirmation(
        &self,
        confirmation: &ReservationConfirmation,
    ) -> Result<(), NotificationError>;
}
