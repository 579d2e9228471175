//! Room DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{Room, RoomDraft};

#[derive(Debug, Serialize, ToSchema)]
pub struct RoomDto {
    pub id: i32,
    pub hotel_id: i32,
    pub hotel_name: String,
    pub room_type: String,
    pub location: String,
    pub capacity: u32,
    pub base_price: Decimal,
    pub taxes: Decimal,
    /// `base_price + taxes`
    pub nightly_rate: Decimal,
    pub is_active: bool,
}

impl From<Room> for RoomDto {
    fn from(r: Room) -> Self {
        Self {
            nightly_rate: r.nightly_rate(),
            id: r.id,
            hotel_id: r.hotel_id,
            hotel_name: r.hotel_name,
            room_type: r.room_type,
            location: r.location,
            capacity: r.capacity,
            base_price: r.base_price,
            taxes: r.taxes,
            is_active: r.is_active,
        }
    }
}

/// Body for both create and full update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RoomRequest {
    #[validate(range(min = 1, message = "hotel_id must be positive"))]
    pub hotel_id: i32,
    #[validate(length(min = 1, max = 100, message = "room_type must be 1-100 characters"))]
    pub room_type: String,
    #[validate(length(min = 1, max = 200, message = "location must be 1-200 characters"))]
    pub location: String,
    #[validate(range(min = 1, max = 100, message = "capacity must be 1-100"))]
    pub capacity: u32,
    pub base_price: Decimal,
    pub taxes: Decimal,
}

impl From<RoomRequest> for RoomDraft {
    fn from(r: RoomRequest) -> Self {
        Self {
            hotel_id: r.hotel_id,
            room_type: r.room_type,
            location: r.location,
            capacity: r.capacity,
            base_price: r.base_price,
            taxes: r.taxes,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListRoomsParams {
    /// Include deactivated rooms
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityParams {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityDto {
    pub room_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub available: bool,
}
