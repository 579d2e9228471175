//! Mail-based reservation confirmations
//!
//! Renders a plain-text confirmation message, logs it and, when an outbox
//! directory is configured, drops it there as an `.eml` file for a mail
//! relay to pick up.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use crate::application::ports::{NotificationError, ReservationConfirmation, ReservationNotifier};

pub const CONFIRMATION_SUBJECT: &str = "Reservation Confirmation";

/// Sender identity and delivery switches
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub sender_email: String,
    pub sender_name: String,
    pub outbox_dir: Option<PathBuf>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sender_email: "reservations@hotel-booking.local".to_string(),
            sender_name: "Hotel Booking".to_string(),
            outbox_dir: None,
        }
    }
}

pub struct MailNotifier {
    settings: NotificationSettings,
}

impl MailNotifier {
    pub fn new(settings: NotificationSettings) -> Self {
        Self { settings }
    }

    pub fn render_body(confirmation: &ReservationConfirmation) -> String {
        format!(
            "Hello {},\n\nYour reservation at {} is confirmed.\nCheck-in: {}\nCheck-out: {}\nTotal Price: {}\n\nThank you for choosing us!",
            confirmation.guest_full_name,
            confirmation.hotel_name,
            confirmation.check_in,
            confirmation.check_out,
            confirmation.total_price,
        )
    }

    /// Full RFC 5322 message, headers included
    pub fn render_message(&self, confirmation: &ReservationConfirmation) -> String {
        format!(
            "From: {} <{}>\r\nTo: {}\r\nSubject: {}\r\nDate: {}\r\nContent-Type: text/plain; charset=utf-8\r\n\r\n{}\r\n",
            self.settings.sender_name,
            self.settings.sender_email,
            confirmation.email,
            CONFIRMATION_SUBJECT,
            Utc::now().to_rfc2822(),
            Self::render_body(confirmation).replace('\n', "\r\n"),
        )
    }
}

#[async_trait]
impl ReservationNotifier for MailNotifier {
    async fn send_reservation_confirmation(
        &self,
        confirmation: &ReservationConfirmation,
    ) -> Result<(), NotificationError> {
        if !self.settings.enabled {
            debug!(to = %confirmation.email, "Notifications disabled, confirmation skipped");
            return Ok(());
        }
        if !confirmation.email.contains('@') {
            return Err(NotificationError::Delivery(format!(
                "invalid recipient address '{}'",
                confirmation.email
            )));
        }

        let message = self.render_message(confirmation);

        if let Some(dir) = &self.settings.outbox_dir {
            tokio::fs::create_dir_all(dir).await?;
            let path = dir.join(format!(
                "{}-{}.eml",
                Utc::now().format("%Y%m%dT%H%M%S"),
                uuid::Uuid::new_v4()
            ));
            tokio::fs::write(&path, message.as_bytes()).await?;
            debug!(path = %path.display(), "Confirmation written to outbox");
        }

        info!(
            to = %confirmation.email,
            hotel = %confirmation.hotel_name,
            subject = CONFIRMATION_SUBJECT,
            "Reservation confirmation sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn confirmation(email: &str) -> ReservationConfirmation {
        ReservationConfirmation {
            email: email.into(),
            guest_full_name: "Ana Silva".into(),
            hotel_name: "Harbor Inn".into(),
            check_in: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2030, 6, 4).unwrap(),
            total_price: Decimal::from_str("361.50").unwrap(),
        }
    }

    fn outbox() -> PathBuf {
        std::env::temp_dir().join(format!("hotel-booking-outbox-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn body_lists_stay_details() {
        let body = MailNotifier::render_body(&confirmation("ana@example.com"));
        assert!(body.starts_with("Hello Ana Silva,"));
        assert!(body.contains("Your reservation at Harbor Inn is confirmed."));
        assert!(body.contains("Check-in: 2030-06-01"));
        assert!(body.contains("Check-out: 2030-06-04"));
        assert!(body.contains("Total Price: 361.50"));
    }

    #[tokio::test]
    async fn writes_eml_into_outbox() {
        let dir = outbox();
        let notifier = MailNotifier::new(NotificationSettings {
            outbox_dir: Some(dir.clone()),
            ..Default::default()
        });
        notifier
            .send_reservation_confirmation(&confirmation("ana@example.com"))
            .await
            .unwrap();

        let mut entries = std::fs::read_dir(&dir).unwrap();
        let file = entries.next().unwrap().unwrap().path();
        let content = std::fs::read_to_string(&file).unwrap();
        assert!(content.contains("To: ana@example.com"));
        assert!(content.contains("Subject: Reservation Confirmation"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn disabled_notifier_writes_nothing() {
        let dir = outbox();
        let notifier = MailNotifier::new(NotificationSettings {
            enabled: false,
            outbox_dir: Some(dir.clone()),
            ..Default::default()
        });
        notifier
            .send_reservation_confirmation(&confirmation("ana@example.com"))
            .await
            .unwrap();
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn bad_recipient_is_a_delivery_error() {
        let notifier = MailNotifier::new(NotificationSettings::default());
        let err = notifier
            .send_reservation_confirmation(&confirmation("nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, NotificationError::Delivery(_)));
    }
}
