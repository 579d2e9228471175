//! Reservation domain entity
//!
//! Holds the booking rules that do not need storage: the half-open stay
//! period, the overlap predicate, night count and price.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::shared::errors::DomainError;
use crate::shared::money::round_money;

/// Whether the candidate stay `[in_start, in_end)` collides with an existing
/// stay `[ex_start, ex_end)`.
///
/// Stays that only touch (one checks out the day the other checks in) do
/// not collide.
pub fn dates_overlap(
    in_start: NaiveDate,
    in_end: NaiveDate,
    ex_start: NaiveDate,
    ex_end: NaiveDate,
) -> bool {
    (in_start >= ex_start && in_start < ex_end)
        || (in_end > ex_start && in_end <= ex_end)
        || (in_start <= ex_start && in_end >= ex_end)
}

/// Check-in / check-out pair with `check_out > check_in`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayPeriod {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayPeriod {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, DomainError> {
        if check_out <= check_in {
            return Err(DomainError::InvalidDateRange(format!(
                "check-out {} must be after check-in {}",
                check_out, check_in
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn overlaps(&self, other: &StayPeriod) -> bool {
        dates_overlap(self.check_in, self.check_out, other.check_in, other.check_out)
    }

    /// `nightly_rate * nights`, rounded to cents
    pub fn price(&self, nightly_rate: Decimal) -> Decimal {
        round_money(nightly_rate * Decimal::from(self.nights()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Passport,
    NationalId,
    DriverLicense,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passport => "Passport",
            Self::NationalId => "NationalId",
            Self::DriverLicense => "DriverLicense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Passport" => Some(Self::Passport),
            "NationalId" => Some(Self::NationalId),
            "DriverLicense" => Some(Self::DriverLicense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Guest staying under a reservation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub document_type: DocumentType,
    pub document_number: String,
    pub gender: Gender,
    pub email: String,
    pub phone: String,
}

impl Guest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Checks every guest against `today`: at least one guest, nobody born in
/// the future, names and document number present.
pub fn validate_guests(guests: &[Guest], today: NaiveDate) -> Result<(), DomainError> {
    if guests.is_empty() {
        return Err(DomainError::InvalidGuestData(
            "at least one guest is required".into(),
        ));
    }
    for (i, guest) in guests.iter().enumerate() {
        if guest.date_of_birth > today {
            return Err(DomainError::InvalidGuestData(format!(
                "guest {} has a date of birth in the future ({})",
                i + 1,
                guest.date_of_birth
            )));
        }
        if guest.first_name.trim().is_empty() || guest.last_name.trim().is_empty() {
            return Err(DomainError::InvalidGuestData(format!(
                "guest {} must have a first and last name",
                i + 1
            )));
        }
        if guest.document_number.trim().is_empty() {
            return Err(DomainError::InvalidGuestData(format!(
                "guest {} must have a document number",
                i + 1
            )));
        }
    }
    Ok(())
}

/// Persisted reservation
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: i32,
    pub room_id: i32,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub total_price: Decimal,
    pub guests: Vec<Guest>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn stay(&self) -> StayPeriod {
        StayPeriod {
            check_in: self.check_in_date,
            check_out: self.check_out_date,
        }
    }
}

/// Validated reservation contents, ready to be written.
#[derive(Debug, Clone)]
pub struct ReservationRecord {
    pub room_id: i32,
    pub stay: StayPeriod,
    pub total_price: Decimal,
    pub guests: Vec<Guest>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn stay(a: &str, b: &str) -> StayPeriod {
        StayPeriod::new(d(a), d(b)).unwrap()
    }

    fn guest(born: &str) -> Guest {
        Guest {
            first_name: "Ana".into(),
            last_name: "Silva".into(),
            date_of_birth: d(born),
            document_type: DocumentType::Passport,
            document_number: "P123456".into(),
            gender: Gender::Female,
            email: "ana@example.com".into(),
            phone: "+351900000000".into(),
        }
    }

    #[test]
    fn touching_stays_do_not_overlap() {
        assert!(!stay("2030-01-01", "2030-01-05").overlaps(&stay("2030-01-05", "2030-01-10")));
        assert!(!stay("2030-01-05", "2030-01-10").overlaps(&stay("2030-01-01", "2030-01-05")));
    }

    #[test]
    fn partial_overlap_conflicts() {
        assert!(stay("2030-01-01", "2030-01-05").overlaps(&stay("2030-01-04", "2030-01-06")));
    }

    #[test]
    fn containment_conflicts_both_ways() {
        let outer = stay("2030-01-01", "2030-01-10");
        let inner = stay("2030-01-03", "2030-01-04");
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(outer.overlaps(&outer));
    }

    #[test]
    fn overlap_is_symmetric() {
        let stays = [
            stay("2030-01-01", "2030-01-05"),
            stay("2030-01-04", "2030-01-06"),
            stay("2030-01-05", "2030-01-10"),
            stay("2030-01-02", "2030-01-03"),
            stay("2030-01-10", "2030-01-12"),
        ];
        for a in &stays {
            for b in &stays {
                assert_eq!(a.overlaps(b), b.overlaps(a), "{:?} vs {:?}", a, b);
            }
        }
    }

    #[test]
    fn empty_or_inverted_range_is_rejected() {
        assert!(matches!(
            StayPeriod::new(d("2030-01-05"), d("2030-01-05")),
            Err(DomainError::InvalidDateRange(_))
        ));
        assert!(matches!(
            StayPeriod::new(d("2030-01-05"), d("2030-01-01")),
            Err(DomainError::InvalidDateRange(_))
        ));
    }

    #[test]
    fn price_is_rate_times_nights() {
        let s = stay("2030-06-04", "2030-06-06");
        assert_eq!(s.nights(), 2);
        assert_eq!(
            s.price(Decimal::from_str("120.50").unwrap()),
            Decimal::from_str("241.00").unwrap()
        );
    }

    #[test]
    fn guest_born_today_is_valid() {
        assert!(validate_guests(&[guest("2030-01-01")], d("2030-01-01")).is_ok());
    }

    #[test]
    fn guest_born_tomorrow_is_invalid() {
        assert!(matches!(
            validate_guests(&[guest("1990-01-01"), guest("2030-01-02")], d("2030-01-01")),
            Err(DomainError::InvalidGuestData(msg)) if msg.contains("guest 2")
        ));
    }

    #[test]
    fn no_guests_is_invalid() {
        assert!(matches!(
            validate_guests(&[], d("2030-01-01")),
            Err(DomainError::InvalidGuestData(_))
        ));
    }

    #[test]
    fn enum_names_parse_back() {
        for dt in [DocumentType::Passport, DocumentType::NationalId, DocumentType::DriverLicense] {
            assert_eq!(DocumentType::parse(dt.as_str()), Some(dt));
        }
        assert_eq!(Gender::parse("Other"), Some(Gender::Other));
        assert_eq!(Gender::parse("unknown"), None);
    }
}
