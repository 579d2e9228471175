//! Outbound notification adapters

pub mod mail;

pub use mail::{MailNotifier, NotificationSettings};
