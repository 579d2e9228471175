//! Room domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::hotel::model::required;
use crate::shared::errors::DomainError;
use crate::shared::money::round_money;

/// Bookable room, read together with the name of the hotel that owns it
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: i32,
    pub hotel_id: i32,
    pub hotel_name: String,
    pub room_type: String,
    pub location: String,
    /// Maximum number of guests
    pub capacity: u32,
    pub base_price: Decimal,
    pub taxes: Decimal,
    /// Only active rooms accept reservations
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Price of one night, taxes included
    pub fn nightly_rate(&self) -> Decimal {
        self.base_price + self.taxes
    }

    pub fn fits(&self, guests: usize) -> bool {
        guests <= self.capacity as usize
    }
}

/// Editable room fields, used for both create and update
#[derive(Debug, Clone)]
pub struct RoomDraft {
    pub hotel_id: i32,
    pub room_type: String,
    pub location: String,
    pub capacity: u32,
    pub base_price: Decimal,
    pub taxes: Decimal,
}

impl RoomDraft {
    pub fn normalized(self) -> Result<Self, DomainError> {
        if self.hotel_id <= 0 {
            return Err(DomainError::Validation("hotel_id must be positive".into()));
        }
        if self.capacity == 0 {
            return Err(DomainError::Validation("capacity must be at least 1".into()));
        }
        if self.base_price.is_sign_negative() {
            return Err(DomainError::Validation("base_price must not be negative".into()));
        }
        if self.taxes.is_sign_negative() {
            return Err(DomainError::Validation("taxes must not be negative".into()));
        }
        Ok(Self {
            hotel_id: self.hotel_id,
            room_type: required("room_type", self.room_type)?,
            location: required("location", self.location)?,
            capacity: self.capacity,
            base_price: round_money(self.base_price),
            taxes: round_money(self.taxes),
        })
    }
}
