//! Hotel catalog service

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::{
    DomainError, DomainResult, Hotel, HotelDraft, RepositoryProvider, Room, StayPeriod,
};
use crate::shared::clock::Clock;

/// A hotel together with its rooms
#[derive(Debug, Clone)]
pub struct HotelDetails {
    pub hotel: Hotel,
    pub rooms: Vec<Room>,
}

/// Search filters. At least one must be set.
#[derive(Debug, Clone, Default)]
pub struct HotelSearch {
    pub city: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: Option<u32>,
}

impl HotelSearch {
    fn is_empty(&self) -> bool {
        self.city.as_deref().map_or(true, |c| c.trim().is_empty())
            && self.check_in.is_none()
            && self.check_out.is_none()
            && self.guests.is_none()
    }
}

pub struct HotelService {
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
}

impl HotelService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    pub async fn list_hotels(&self, include_inactive: bool) -> DomainResult<Vec<Hotel>> {
        self.repos.hotels().find_all(include_inactive).await
    }

    pub async fn get_hotel(&self, id: i32) -> DomainResult<HotelDetails> {
        let hotel = self.find(id).await?;
        let rooms = self.repos.rooms().find_by_hotel(id, false).await?;
        Ok(HotelDetails { hotel, rooms })
    }

    pub async fn create_hotel(&self, draft: HotelDraft) -> DomainResult<Hotel> {
        let hotel = self.repos.hotels().create(draft.normalized()?).await?;
        info!(hotel_id = hotel.id, name = %hotel.name, "Hotel created");
        Ok(hotel)
    }

    pub async fn update_hotel(&self, id: i32, draft: HotelDraft) -> DomainResult<Hotel> {
        let hotel = self.repos.hotels().update(id, draft.normalized()?).await?;
        info!(hotel_id = hotel.id, "Hotel updated");
        Ok(hotel)
    }

    pub async fn set_hotel_status(&self, id: i32, is_active: bool) -> DomainResult<Hotel> {
        let hotel = self.repos.hotels().set_active(id, is_active).await?;
        info!(hotel_id = id, is_active, "Hotel status changed");
        Ok(hotel)
    }

    /// Delete a hotel that no longer has active rooms.
    pub async fn delete_hotel(&self, id: i32) -> DomainResult<()> {
        self.find(id).await?;
        let active_rooms = self.repos.rooms().find_by_hotel(id, true).await?;
        if !active_rooms.is_empty() {
            return Err(DomainError::Conflict(format!(
                "Hotel {} still has {} active room(s)",
                id,
                active_rooms.len()
            )));
        }
        self.repos.hotels().delete(id).await?;
        info!(hotel_id = id, "Hotel deleted");
        Ok(())
    }

    /// Active hotels matching every supplied filter.
    ///
    /// Room filters (guests, dates) must be satisfied by one and the same
    /// active room of the hotel.
    pub async fn search_hotels(&self, search: HotelSearch) -> DomainResult<Vec<Hotel>> {
        if search.is_empty() {
            return Err(DomainError::Validation(
                "At least one search filter is required".into(),
            ));
        }
        if matches!(search.guests, Some(0)) {
            return Err(DomainError::Validation("guests must be at least 1".into()));
        }
        let stay = self.requested_stay(&search)?;
        let city = search
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let mut matches = Vec::new();
        for hotel in self.repos.hotels().find_all(false).await? {
            if city.is_some_and(|c| !hotel.is_in_city(c)) {
                continue;
            }
            if (search.guests.is_some() || stay.is_some())
                && !self.has_matching_room(hotel.id, search.guests, stay).await?
            {
                continue;
            }
            matches.push(hotel);
        }
        Ok(matches)
    }

    fn requested_stay(&self, search: &HotelSearch) -> DomainResult<Option<StayPeriod>> {
        let today = self.clock.today();
        match (search.check_in, search.check_out) {
            (None, None) => Ok(None),
            (Some(check_in), Some(check_out)) => {
                if check_in < today || check_out < today {
                    return Err(DomainError::InvalidDateRange(
                        "search dates must not be in the past".into(),
                    ));
                }
                StayPeriod::new(check_in, check_out).map(Some)
            }
            _ => Err(DomainError::InvalidDateRange(
                "check_in and check_out must be given together".into(),
            )),
        }
    }

    async fn has_matching_room(
        &self,
        hotel_id: i32,
        guests: Option<u32>,
        stay: Option<StayPeriod>,
    ) -> DomainResult<bool> {
        for room in self.repos.rooms().find_by_hotel(hotel_id, true).await? {
            if guests.is_some_and(|g| !room.fits(g as usize)) {
                continue;
            }
            match stay {
                Some(stay) => {
                    if !self
                        .repos
                        .reservations()
                        .has_overlap(room.id, stay, None)
                        .await?
                    {
                        return Ok(true);
                    }
                }
                None => return Ok(true),
            }
        }
        Ok(false)
    }

    async fn find(&self, id: i32) -> DomainResult<Hotel> {
        self.repos
            .hotels()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "Hotel",
                field: "id",
                value: id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::domain::{DocumentType, Gender, Guest, ReservationRecord, RoomDraft};
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::shared::clock::FixedClock;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn draft(name: &str, city: &str) -> HotelDraft {
        HotelDraft {
            name: name.into(),
            address: "Main Street 1".into(),
            city: city.into(),
        }
    }

    fn room(hotel_id: i32, capacity: u32) -> RoomDraft {
        RoomDraft {
            hotel_id,
            room_type: "Standard".into(),
            location: "1st floor".into(),
            capacity,
            base_price: Decimal::from(80),
            taxes: Decimal::from(8),
        }
    }

    async fn book(storage: &InMemoryStorage, room_id: i32, from: &str, to: &str) {
        storage
            .reservations()
            .insert_if_available(ReservationRecord {
                room_id,
                stay: StayPeriod::new(d(from), d(to)).unwrap(),
                total_price: Decimal::from(100),
                guests: vec![Guest {
                    first_name: "Ana".into(),
                    last_name: "Costa".into(),
                    date_of_birth: d("1990-01-01"),
                    document_type: DocumentType::NationalId,
                    document_number: "X1".into(),
                    gender: Gender::Female,
                    email: "ana@example.com".into(),
                    phone: "1".into(),
                }],
                emergency_contact_name: None,
                emergency_contact_phone: None,
            })
            .await
            .unwrap();
    }

    fn service(storage: Arc<InMemoryStorage>) -> HotelService {
        HotelService::new(storage, Arc::new(FixedClock(d("2030-05-01"))))
    }

    #[tokio::test]
    async fn create_trims_and_rejects_blank_fields() {
        let svc = service(Arc::new(InMemoryStorage::new()));
        let hotel = svc.create_hotel(draft("  Harbor Inn ", "Lisbon")).await.unwrap();
        assert_eq!(hotel.name, "Harbor Inn");
        assert!(hotel.is_active);

        let err = svc.create_hotel(draft("Harbor Inn", "   ")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn get_includes_rooms_and_reports_missing_hotel() {
        let storage = Arc::new(InMemoryStorage::new());
        let svc = service(storage.clone());
        let hotel = svc.create_hotel(draft("Harbor Inn", "Lisbon")).await.unwrap();
        storage.rooms().create(room(hotel.id, 2)).await.unwrap();

        let details = svc.get_hotel(hotel.id).await.unwrap();
        assert_eq!(details.rooms.len(), 1);
        assert_eq!(details.rooms[0].hotel_name, "Harbor Inn");

        assert!(matches!(
            svc.get_hotel(999).await,
            Err(DomainError::NotFound { entity: "Hotel", .. })
        ));
    }

    #[tokio::test]
    async fn hotel_with_active_room_cannot_be_deleted() {
        let storage = Arc::new(InMemoryStorage::new());
        let svc = service(storage.clone());
        let hotel = svc.create_hotel(draft("Harbor Inn", "Lisbon")).await.unwrap();
        let r = storage.rooms().create(room(hotel.id, 2)).await.unwrap();

        assert!(matches!(
            svc.delete_hotel(hotel.id).await,
            Err(DomainError::Conflict(_))
        ));

        storage.rooms().set_active(r.id, false).await.unwrap();
        svc.delete_hotel(hotel.id).await.unwrap();
        assert!(storage.rooms().find_by_id(r.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn inactive_hotels_hidden_unless_requested() {
        let svc = service(Arc::new(InMemoryStorage::new()));
        let a = svc.create_hotel(draft("A", "Lisbon")).await.unwrap();
        svc.create_hotel(draft("B", "Porto")).await.unwrap();
        svc.set_hotel_status(a.id, false).await.unwrap();

        assert_eq!(svc.list_hotels(false).await.unwrap().len(), 1);
        assert_eq!(svc.list_hotels(true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn search_needs_a_filter_and_sane_values() {
        let svc = service(Arc::new(InMemoryStorage::new()));
        assert!(matches!(
            svc.search_hotels(HotelSearch::default()).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            svc.search_hotels(HotelSearch {
                guests: Some(0),
                ..Default::default()
            })
            .await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            svc.search_hotels(HotelSearch {
                check_in: Some(d("2030-04-01")),
                check_out: Some(d("2030-04-03")),
                ..Default::default()
            })
            .await,
            Err(DomainError::InvalidDateRange(_))
        ));
        assert!(matches!(
            svc.search_hotels(HotelSearch {
                check_in: Some(d("2030-06-01")),
                ..Default::default()
            })
            .await,
            Err(DomainError::InvalidDateRange(_))
        ));
    }

    #[tokio::test]
    async fn search_by_city_ignores_case_and_inactive_hotels() {
        let svc = service(Arc::new(InMemoryStorage::new()));
        svc.create_hotel(draft("A", "Lisbon")).await.unwrap();
        let b = svc.create_hotel(draft("B", "lisbon")).await.unwrap();
        svc.create_hotel(draft("C", "Porto")).await.unwrap();
        svc.set_hotel_status(b.id, false).await.unwrap();

        let found = svc
            .search_hotels(HotelSearch {
                city: Some(" LISBON ".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "A");
    }

    #[tokio::test]
    async fn room_filters_must_hold_for_the_same_room() {
        let storage = Arc::new(InMemoryStorage::new());
        let svc = service(storage.clone());
        let hotel = svc.create_hotel(draft("A", "Lisbon")).await.unwrap();
        // Big room is booked, small room is free but too small.
        let big = storage.rooms().create(room(hotel.id, 4)).await.unwrap();
        storage.rooms().create(room(hotel.id, 1)).await.unwrap();
        book(&storage, big.id, "2030-06-01", "2030-06-05").await;

        let search = HotelSearch {
            city: Some("Lisbon".into()),
            check_in: Some(d("2030-06-02")),
            check_out: Some(d("2030-06-04")),
            guests: Some(3),
        };
        assert!(svc.search_hotels(search.clone()).await.unwrap().is_empty());

        let later = HotelSearch {
            check_in: Some(d("2030-06-05")),
            check_out: Some(d("2030-06-07")),
            ..search
        };
        assert_eq!(svc.search_hotels(later).await.unwrap().len(), 1);
    }
}
