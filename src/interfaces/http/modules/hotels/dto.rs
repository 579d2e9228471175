//! Hotel DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{HotelDetails, HotelSearch};
use crate::domain::{Hotel, HotelDraft};
use crate::interfaces::http::modules::rooms::RoomDto;

#[derive(Debug, Serialize, ToSchema)]
pub struct HotelDto {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Hotel> for HotelDto {
    fn from(h: Hotel) -> Self {
        Self {
            id: h.id,
            name: h.name,
            address: h.address,
            city: h.city,
            is_active: h.is_active,
            created_at: h.created_at,
            updated_at: h.updated_at,
        }
    }
}

/// Hotel with its rooms
#[derive(Debug, Serialize, ToSchema)]
pub struct HotelDetailsDto {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub is_active: bool,
    pub rooms: Vec<RoomDto>,
}

impl From<HotelDetails> for HotelDetailsDto {
    fn from(d: HotelDetails) -> Self {
        Self {
            id: d.hotel.id,
            name: d.hotel.name,
            address: d.hotel.address,
            city: d.hotel.city,
            is_active: d.hotel.is_active,
            rooms: d.rooms.into_iter().map(RoomDto::from).collect(),
        }
    }
}

/// Body for both create and full update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct HotelRequest {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 500, message = "address must be 1-500 characters"))]
    pub address: String,
    #[validate(length(min = 1, max = 100, message = "city must be 1-100 characters"))]
    pub city: String,
}

impl From<HotelRequest> for HotelDraft {
    fn from(r: HotelRequest) -> Self {
        Self {
            name: r.name,
            address: r.address,
            city: r.city,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListHotelsParams {
    /// Include deactivated hotels
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchHotelsParams {
    pub city: Option<String>,
    /// YYYY-MM-DD, requires `check_out`
    pub check_in: Option<NaiveDate>,
    /// YYYY-MM-DD, requires `check_in`
    pub check_out: Option<NaiveDate>,
    pub guests: Option<u32>,
}

impl From<SearchHotelsParams> for HotelSearch {
    fn from(p: SearchHotelsParams) -> Self {
        Self {
            city: p.city,
            check_in: p.check_in,
            check_out: p.check_out,
            guests: p.guests,
        }
    }
}
