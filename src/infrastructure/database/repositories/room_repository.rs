//! SeaORM implementation of RoomRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info};

use super::db_err;
use crate::domain::room::{Room, RoomDraft, RoomRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{hotel, room};
use crate::shared::money::{from_minor_units, to_minor_units};

pub struct SeaOrmRoomRepository {
    db: DatabaseConnection,
}

impl SeaOrmRoomRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load(&self, id: i32) -> DomainResult<Option<Room>> {
        let row = room::Entity::find_by_id(id)
            .find_also_related(hotel::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.map(|(r, h)| model_to_domain(r, h)))
    }

    async fn hotel_exists(&self, hotel_id: i32) -> DomainResult<()> {
        let found = hotel::Entity::find_by_id(hotel_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        match found {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound {
                entity: "Hotel",
                field: "id",
                value: hotel_id.to_string(),
            }),
        }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: room::Model, h: Option<hotel::Model>) -> Room {
    Room {
        id: m.id,
        hotel_id: m.hotel_id,
        hotel_name: h.map(|h| h.name).unwrap_or_default(),
        room_type: m.room_type,
        location: m.location,
        capacity: m.capacity.max(0) as u32,
        base_price: from_minor_units(m.base_price_cents),
        taxes: from_minor_units(m.taxes_cents),
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

/// Capacity as stored in the `capacity` INTEGER column
fn capacity_column(capacity: u32) -> DomainResult<i32> {
    i32::try_from(capacity)
        .map_err(|_| DomainError::Validation(format!("capacity {} is out of range", capacity)))
}

// ── RoomRepository impl ─────────────────────────────────────────

#[async_trait]
impl RoomRepository for SeaOrmRoomRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        self.load(id).await
    }

    async fn find_by_hotel(&self, hotel_id: i32, active_only: bool) -> DomainResult<Vec<Room>> {
        let mut query = room::Entity::find()
            .filter(room::Column::HotelId.eq(hotel_id))
            .find_also_related(hotel::Entity);
        if active_only {
            query = query.filter(room::Column::IsActive.eq(true));
        }
        let rows = query
            .order_by_asc(room::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|(r, h)| model_to_domain(r, h))
            .collect())
    }

    async fn create(&self, draft: RoomDraft) -> DomainResult<Room> {
        let capacity = capacity_column(draft.capacity)?;
        self.hotel_exists(draft.hotel_id).await?;

        let now = Utc::now();
        let model = room::ActiveModel {
            id: NotSet,
            hotel_id: Set(draft.hotel_id),
            room_type: Set(draft.room_type),
            location: Set(draft.location),
            capacity: Set(capacity),
            base_price_cents: Set(to_minor_units(draft.base_price)?),
            taxes_cents: Set(to_minor_units(draft.taxes)?),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        info!(room_id = saved.id, hotel_id = saved.hotel_id, "Room created");

        self.load(saved.id)
            .await?
            .ok_or(DomainError::RoomNotFound(saved.id))
    }

    async fn update(&self, id: i32, draft: RoomDraft) -> DomainResult<Room> {
        debug!("Updating room: {}", id);
        let capacity = capacity_column(draft.capacity)?;

        let existing = room::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::RoomNotFound(id))?;
        self.hotel_exists(draft.hotel_id).await?;

        let mut active: room::ActiveModel = existing.into();
        active.hotel_id = Set(draft.hotel_id);
        active.room_type = Set(draft.room_type);
        active.location = Set(draft.location);
        active.capacity = Set(capacity);
        active.base_price_cents = Set(to_minor_units(draft.base_price)?);
        active.taxes_cents = Set(to_minor_units(draft.taxes)?);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;

        self.load(id).await?.ok_or(DomainError::RoomNotFound(id))
    }

    async fn set_active(&self, id: i32, is_active: bool) -> DomainResult<Room> {
        let existing = room::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::RoomNotFound(id))?;

        let mut active: room::ActiveModel = existing.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)?;

        self.load(id).await?.ok_or(DomainError::RoomNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_fits_integer_column() {
        assert_eq!(capacity_column(4).unwrap(), 4);
        assert_eq!(capacity_column(i32::MAX as u32).unwrap(), i32::MAX);
    }

    #[test]
    fn oversized_capacity_is_rejected() {
        assert!(matches!(
            capacity_column(i32::MAX as u32 + 1),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            capacity_column(u32::MAX),
            Err(DomainError::Validation(_))
        ));
    }
}
