//! SeaORM implementation of HotelRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info};

use super::db_err;
use crate::domain::hotel::{Hotel, HotelDraft, HotelRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::hotel;

pub struct SeaOrmHotelRepository {
    db: DatabaseConnection,
}

impl SeaOrmHotelRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: i32) -> DomainResult<hotel::Model> {
        hotel::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| not_found(id))
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: hotel::Model) -> Hotel {
    Hotel {
        id: m.id,
        name: m.name,
        address: m.address,
        city: m.city,
        is_active: m.is_active,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn not_found(id: i32) -> DomainError {
    DomainError::NotFound {
        entity: "Hotel",
        field: "id",
        value: id.to_string(),
    }
}

// ── HotelRepository impl ────────────────────────────────────────

#[async_trait]
impl HotelRepository for SeaOrmHotelRepository {
    async fn find_all(&self, include_inactive: bool) -> DomainResult<Vec<Hotel>> {
        let mut query = hotel::Entity::find();
        if !include_inactive {
            query = query.filter(hotel::Column::IsActive.eq(true));
        }
        let models = query
            .order_by_asc(hotel::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Hotel>> {
        let model = hotel::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn create(&self, draft: HotelDraft) -> DomainResult<Hotel> {
        let now = Utc::now();
        let model = hotel::ActiveModel {
            id: NotSet,
            name: Set(draft.name),
            address: Set(draft.address),
            city: Set(draft.city),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let saved = model.insert(&self.db).await.map_err(db_err)?;
        info!(hotel_id = saved.id, name = %saved.name, "Hotel created");
        Ok(model_to_domain(saved))
    }

    async fn update(&self, id: i32, draft: HotelDraft) -> DomainResult<Hotel> {
        debug!("Updating hotel: {}", id);

        let mut active: hotel::ActiveModel = self.find_model(id).await?.into();
        active.name = Set(draft.name);
        active.address = Set(draft.address);
        active.city = Set(draft.city);
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(updated))
    }

    async fn set_active(&self, id: i32, is_active: bool) -> DomainResult<Hotel> {
        let mut active: hotel::ActiveModel = self.find_model(id).await?.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(updated))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = hotel::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(not_found(id));
        }

        info!(hotel_id = id, "Hotel deleted");
        Ok(())
    }
}
