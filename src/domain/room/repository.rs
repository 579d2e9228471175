//! Room repository interface
//!
//! Doubles as the room lookup the reservation flow consumes: every read
//! returns capacity, pricing, the active flag and the parent hotel name.

use async_trait::async_trait;

use super::model::{Room, RoomDraft};
use crate::domain::DomainResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>>;

    /// Rooms of one hotel ordered by id
    async fn find_by_hotel(&self, hotel_id: i32, active_only: bool) -> DomainResult<Vec<Room>>;

    async fn create(&self, draft: RoomDraft) -> DomainResult<Room>;

    async fn update(&self, id: i32, draft: RoomDraft) -> DomainResult<Room>;

    async fn set_active(&self, id: i32, is_active: bool) -> DomainResult<Room>;
}
