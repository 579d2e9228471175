//! Hotel domain entity

use chrono::{DateTime, Utc};

use crate::shared::errors::DomainError;

/// Hotel
#[derive(Debug, Clone, PartialEq)]
pub struct Hotel {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    /// Inactive hotels are hidden from search and default listings
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable hotel fields, used for both create and update
#[derive(Debug, Clone)]
pub struct HotelDraft {
    pub name: String,
    pub address: String,
    pub city: String,
}

impl HotelDraft {
    /// Trim all fields and reject blank ones.
    pub fn normalized(self) -> Result<Self, DomainError> {
        let name = required("name", self.name)?;
        let address = required("address", self.address)?;
        let city = required("city", self.city)?;
        Ok(Self {
            name,
            address,
            city,
        })
    }
}

pub(crate) fn required(field: &str, value: String) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

impl Hotel {
    /// Case-insensitive city comparison, ignoring surrounding whitespace.
    pub fn is_in_city(&self, city: &str) -> bool {
        self.city.trim().to_lowercase() == city.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(city: &str) -> Hotel {
        Hotel {
            id: 1,
            name: "Harbor Inn".into(),
            address: "1 Quay Street".into(),
            city: city.into(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn city_match_ignores_case_and_padding() {
        let h = hotel("Lisbon");
        assert!(h.is_in_city(" lisbon "));
        assert!(h.is_in_city("LISBON"));
        assert!(!h.is_in_city("Porto"));
    }

    #[test]
    fn draft_rejects_blank_fields() {
        let draft = HotelDraft {
            name: "  ".into(),
            address: "1 Quay Street".into(),
            city: "Lisbon".into(),
        };
        assert!(matches!(
            draft.normalized(),
            Err(DomainError::Validation(msg)) if msg == "name is required"
        ));
    }

    #[test]
    fn draft_trims_fields() {
        let draft = HotelDraft {
            name: " Harbor Inn ".into(),
            address: "1 Quay Street".into(),
            city: " Lisbon".into(),
        }
        .normalized()
        .unwrap();
        assert_eq!(draft.name, "Harbor Inn");
        assert_eq!(draft.city, "Lisbon");
    }
}
