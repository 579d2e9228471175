//! Room management service

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, Room, RoomDraft};

pub struct RoomService {
    repos: Arc<dyn RepositoryProvider>,
}

impl RoomService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn get_room(&self, id: i32) -> DomainResult<Room> {
        self.repos
            .rooms()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::RoomNotFound(id))
    }

    /// Rooms of a hotel; `NotFound` when the hotel does not exist.
    pub async fn list_rooms(&self, hotel_id: i32, include_inactive: bool) -> DomainResult<Vec<Room>> {
        if self.repos.hotels().find_by_id(hotel_id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity: "Hotel",
                field: "id",
                value: hotel_id.to_string(),
            });
        }
        self.repos
            .rooms()
            .find_by_hotel(hotel_id, !include_inactive)
            .await
    }

    pub async fn create_room(&self, draft: RoomDraft) -> DomainResult<Room> {
        let room = self.repos.rooms().create(draft.normalized()?).await?;
        info!(room_id = room.id, hotel_id = room.hotel_id, "Room created");
        Ok(room)
    }

    pub async fn update_room(&self, id: i32, draft: RoomDraft) -> DomainResult<Room> {
        let room = self.repos.rooms().update(id, draft.normalized()?).await?;
        info!(room_id = room.id, "Room updated");
        Ok(room)
    }

    pub async fn set_room_status(&self, id: i32, is_active: bool) -> DomainResult<Room> {
        let room = self.repos.rooms().set_active(id, is_active).await?;
        info!(room_id = id, is_active, "Room status changed");
        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use crate::domain::HotelDraft;
    use crate::infrastructure::storage::InMemoryStorage;

    fn draft(hotel_id: i32) -> RoomDraft {
        RoomDraft {
            hotel_id,
            room_type: " Suite ".into(),
            location: "Top floor".into(),
            capacity: 3,
            base_price: Decimal::from_str("150.005").unwrap(),
            taxes: Decimal::from(15),
        }
    }

    async fn setup() -> (Arc<InMemoryStorage>, RoomService, i32) {
        let storage = Arc::new(InMemoryStorage::new());
        let hotel = storage
            .hotels()
            .create(HotelDraft {
                name: "Harbor Inn".into(),
                address: "1 Quay Street".into(),
                city: "Lisbon".into(),
            })
            .await
            .unwrap();
        let svc = RoomService::new(storage.clone());
        (storage, svc, hotel.id)
    }

    #[tokio::test]
    async fn create_normalizes_draft() {
        let (_, svc, hotel_id) = setup().await;
        let room = svc.create_room(draft(hotel_id)).await.unwrap();
        assert_eq!(room.room_type, "Suite");
        assert_eq!(room.base_price, Decimal::from_str("150.01").unwrap());
        assert_eq!(room.hotel_name, "Harbor Inn");
        assert!(room.is_active);
    }

    #[tokio::test]
    async fn create_rejects_bad_drafts() {
        let (_, svc, hotel_id) = setup().await;

        let mut zero = draft(hotel_id);
        zero.capacity = 0;
        assert!(matches!(svc.create_room(zero).await, Err(DomainError::Validation(_))));

        let mut negative = draft(hotel_id);
        negative.taxes = Decimal::from(-1);
        assert!(matches!(svc.create_room(negative).await, Err(DomainError::Validation(_))));

        assert!(matches!(
            svc.create_room(draft(hotel_id + 100)).await,
            Err(DomainError::NotFound { entity: "Hotel", .. })
        ));
    }

    #[tokio::test]
    async fn list_respects_active_flag_and_missing_hotel() {
        let (_, svc, hotel_id) = setup().await;
        let a = svc.create_room(draft(hotel_id)).await.unwrap();
        svc.create_room(draft(hotel_id)).await.unwrap();
        svc.set_room_status(a.id, false).await.unwrap();

        assert_eq!(svc.list_rooms(hotel_id, false).await.unwrap().len(), 1);
        assert_eq!(svc.list_rooms(hotel_id, true).await.unwrap().len(), 2);
        assert!(matches!(
            svc.list_rooms(999, true).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_room_is_room_not_found() {
        let (_, svc, _) = setup().await;
        assert!(matches!(svc.get_room(5).await, Err(DomainError::RoomNotFound(5))));
        assert!(matches!(
            svc.update_room(5, draft(1)).await,
            Err(DomainError::RoomNotFound(5))
        ));
    }
}
