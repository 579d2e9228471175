//! Hotel repository interface

use async_trait::async_trait;

use super::model::{Hotel, HotelDraft};
use crate::domain::DomainResult;

#[async_trait]
pub trait HotelRepository: Send + Sync {
    /// All hotels ordered by id; inactive ones only when asked for
    async fn find_all(&self, include_inactive: bool) -> DomainResult<Vec<Hotel>>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Hotel>>;

    async fn create(&self, draft: HotelDraft) -> DomainResult<Hotel>;

    /// Overwrite name, address and city. `NotFound` if absent.
    async fn update(&self, id: i32, draft: HotelDraft) -> DomainResult<Hotel>;

    async fn set_active(&self, id: i32, is_active: bool) -> DomainResult<Hotel>;

    /// Delete the hotel together with its rooms and their reservations.
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
