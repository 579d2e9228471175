//! Reservation repository interface

use async_trait::async_trait;

use super::model::{Reservation, ReservationRecord, StayPeriod};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Find reservation by ID, guests included
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>>;

    async fn find_all(&self) -> DomainResult<Vec<Reservation>>;

    async fn find_by_room(&self, room_id: i32) -> DomainResult<Vec<Reservation>>;

    /// Whether any reservation of the room, other than `exclude`, overlaps `stay`
    async fn has_overlap(
        &self,
        room_id: i32,
        stay: StayPeriod,
        exclude: Option<i32>,
    ) -> DomainResult<bool>;

    /// Insert the reservation and its guests as one unit.
    ///
    /// Fails without writing anything when, at write time, the room is
    /// missing (`RoomNotFound`), inactive (`RoomUnavailable`) or already has
    /// an overlapping reservation (`DateConflict`).
    async fn insert_if_available(&self, record: ReservationRecord) -> DomainResult<Reservation>;

    /// Replace dates, room, price, contact fields and the full guest list of
    /// reservation `id` as one unit.
    ///
    /// Fails with `ReservationNotFound`, `RoomNotFound`, `RoomUnavailable` or
    /// `DateConflict` (ignoring the reservation itself) without writing
    /// anything.
    async fn replace_if_available(
        &self,
        id: i32,
        record: ReservationRecord,
    ) -> DomainResult<Reservation>;

    /// Hard delete, guests included. `ReservationNotFound` if absent.
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
