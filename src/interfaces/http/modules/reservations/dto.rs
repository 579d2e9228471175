//! Reservation DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::ReservationInput;
use crate::domain::{DocumentType, Gender, Guest, Reservation};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub enum DocumentTypeDto {
    Passport,
    NationalId,
    DriverLicense,
}

impl From<DocumentTypeDto> for DocumentType {
    fn from(d: DocumentTypeDto) -> Self {
        match d {
            DocumentTypeDto::Passport => DocumentType::Passport,
            DocumentTypeDto::NationalId => DocumentType::NationalId,
            DocumentTypeDto::DriverLicense => DocumentType::DriverLicense,
        }
    }
}

impl From<DocumentType> for DocumentTypeDto {
    fn from(d: DocumentType) -> Self {
        match d {
            DocumentType::Passport => DocumentTypeDto::Passport,
            DocumentType::NationalId => DocumentTypeDto::NationalId,
            DocumentType::DriverLicense => DocumentTypeDto::DriverLicense,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub enum GenderDto {
    Male,
    Female,
    Other,
}

impl From<GenderDto> for Gender {
    fn from(g: GenderDto) -> Self {
        match g {
            GenderDto::Male => Gender::Male,
            GenderDto::Female => Gender::Female,
            GenderDto::Other => Gender::Other,
        }
    }
}

impl From<Gender> for GenderDto {
    fn from(g: Gender) -> Self {
        match g {
            Gender::Male => GenderDto::Male,
            Gender::Female => GenderDto::Female,
            Gender::Other => GenderDto::Other,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct GuestDto {
    #[validate(length(max = 100))]
    pub first_name: String,
    #[validate(length(max = 100))]
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub document_type: DocumentTypeDto,
    #[validate(length(max = 50))]
    pub document_number: String,
    pub gender: GenderDto,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(max = 30))]
    pub phone: String,
}

impl From<GuestDto> for Guest {
    fn from(g: GuestDto) -> Self {
        Self {
            first_name: g.first_name,
            last_name: g.last_name,
            date_of_birth: g.date_of_birth,
            document_type: g.document_type.into(),
            document_number: g.document_number,
            gender: g.gender.into(),
            email: g.email,
            phone: g.phone,
        }
    }
}

impl From<Guest> for GuestDto {
    fn from(g: Guest) -> Self {
        Self {
            first_name: g.first_name,
            last_name: g.last_name,
            date_of_birth: g.date_of_birth,
            document_type: g.document_type.into(),
            document_number: g.document_number,
            gender: g.gender.into(),
            email: g.email,
            phone: g.phone,
        }
    }
}

/// Body for both create and update. Update replaces every field,
/// the guest list included.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReservationRequest {
    pub room_id: i32,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    #[validate(nested)]
    pub guests: Vec<GuestDto>,
    #[validate(length(max = 100))]
    pub emergency_contact_name: Option<String>,
    #[validate(length(max = 30))]
    pub emergency_contact_phone: Option<String>,
}

impl From<ReservationRequest> for ReservationInput {
    fn from(r: ReservationRequest) -> Self {
        Self {
            room_id: r.room_id,
            check_in_date: r.check_in_date,
            check_out_date: r.check_out_date,
            guests: r.guests.into_iter().map(Guest::from).collect(),
            emergency_contact_name: r.emergency_contact_name,
            emergency_contact_phone: r.emergency_contact_phone,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: i32,
    pub room_id: i32,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub nights: i64,
    pub total_price: Decimal,
    pub guests: Vec<GuestDto>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            nights: r.stay().nights(),
            id: r.id,
            room_id: r.room_id,
            check_in_date: r.check_in_date,
            check_out_date: r.check_out_date,
            total_price: r.total_price,
            guests: r.guests.into_iter().map(GuestDto::from).collect(),
            emergency_contact_name: r.emergency_contact_name,
            emergency_contact_phone: r.emergency_contact_phone,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
