//! SeaORM implementation of ReservationRepository
//!
//! Every write runs in one database transaction that re-checks the room and
//! the overlap rule right before writing, so the check and the insert/update
//! (guests included) commit or roll back together.
//!
//! SQLite transactions start deferred and fail with `SQLITE_BUSY` when two of
//! them try to upgrade a read lock to a write lock. On SQLite, writes are
//! queued on `write_lock` and the first statement of the transaction is a
//! write on the room row, so the write lock is taken before any read and
//! other processes wait on the busy timeout instead of failing.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbBackend, EntityTrait, IsolationLevel, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Set, Statement, TransactionTrait,
};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::db_err;
use crate::domain::reservation::{
    dates_overlap, DocumentType, Gender, Guest, Reservation, ReservationRecord,
    ReservationRepository, StayPeriod,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{guest, reservation, room};
use crate::shared::money::{from_minor_units, to_minor_units};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
    write_lock: Mutex<()>,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    fn is_sqlite(&self) -> bool {
        self.db.get_database_backend() == DbBackend::Sqlite
    }

    /// Held for the whole write transaction on SQLite.
    async fn write_guard(&self) -> Option<MutexGuard<'_, ()>> {
        if self.is_sqlite() {
            Some(self.write_lock.lock().await)
        } else {
            None
        }
    }

    /// SQLite serializes writers on its own and rejects isolation levels.
    async fn begin(&self) -> DomainResult<DatabaseTransaction> {
        let txn = match self.db.get_database_backend() {
            DbBackend::Sqlite => self.db.begin().await,
            _ => {
                self.db
                    .begin_with_config(Some(IsolationLevel::Serializable), None)
                    .await
            }
        };
        txn.map_err(db_err)
    }
}

/// Commit on success, roll back on any error.
async fn finish<T>(txn: DatabaseTransaction, result: DomainResult<T>) -> DomainResult<T> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(db_err)?;
            Ok(value)
        }
        Err(e) => {
            txn.rollback().await.map_err(db_err)?;
            Err(e)
        }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn guest_to_domain(m: guest::Model) -> DomainResult<Guest> {
    let document_type = DocumentType::parse(&m.document_type).ok_or_else(|| {
        DomainError::Storage(format!("unknown document type '{}'", m.document_type))
    })?;
    let gender = Gender::parse(&m.gender)
        .ok_or_else(|| DomainError::Storage(format!("unknown gender '{}'", m.gender)))?;
    Ok(Guest {
        first_name: m.first_name,
        last_name: m.last_name,
        date_of_birth: m.date_of_birth,
        document_type,
        document_number: m.document_number,
        gender,
        email: m.email,
        phone: m.phone,
    })
}

fn guest_to_active(reservation_id: i32, g: &Guest) -> guest::ActiveModel {
    guest::ActiveModel {
        id: NotSet,
        reservation_id: Set(reservation_id),
        first_name: Set(g.first_name.clone()),
        last_name: Set(g.last_name.clone()),
        date_of_birth: Set(g.date_of_birth),
        document_type: Set(g.document_type.as_str().to_string()),
        document_number: Set(g.document_number.clone()),
        gender: Set(g.gender.as_str().to_string()),
        email: Set(g.email.clone()),
        phone: Set(g.phone.clone()),
    }
}

fn model_to_domain(m: reservation::Model, guests: Vec<Guest>) -> Reservation {
    Reservation {
        id: m.id,
        room_id: m.room_id,
        check_in_date: m.check_in_date,
        check_out_date: m.check_out_date,
        total_price: from_minor_units(m.total_price_cents),
        guests,
        emergency_contact_name: m.emergency_contact_name,
        emergency_contact_phone: m.emergency_contact_phone,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn conflict(room_id: i32, stay: StayPeriod) -> DomainError {
    DomainError::DateConflict {
        room_id,
        check_in: stay.check_in(),
        check_out: stay.check_out(),
    }
}

// ── Checks at the start of a write transaction ─────────────────

/// Takes the SQLite write lock by touching the room row. Matches no row when
/// the room is gone, which still locks the database. No-op elsewhere.
async fn claim_write_lock(txn: &DatabaseTransaction, room_id: i32) -> DomainResult<()> {
    if txn.get_database_backend() != DbBackend::Sqlite {
        return Ok(());
    }
    txn.execute(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        "UPDATE rooms SET id = id WHERE id = ?",
        [room_id.into()],
    ))
    .await
    .map_err(db_err)?;
    Ok(())
}

/// Room must exist and be active when the reservation is written. Locks the
/// row on backends with row locks so a concurrent deactivation waits.
async fn bookable_room(txn: &DatabaseTransaction, room_id: i32) -> DomainResult<()> {
    let query = room::Entity::find_by_id(room_id);
    let query = match txn.get_database_backend() {
        DbBackend::Sqlite => query,
        _ => query.lock_exclusive(),
    };
    let model = query
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(DomainError::RoomNotFound(room_id))?;
    if !model.is_active {
        return Err(DomainError::RoomUnavailable(room_id));
    }
    Ok(())
}

// ── Queries usable inside and outside a transaction ─────────────

async fn overlapping<C: ConnectionTrait>(
    conn: &C,
    room_id: i32,
    stay: StayPeriod,
    exclude: Option<i32>,
) -> DomainResult<bool> {
    // Narrow in SQL, decide with the domain predicate.
    let candidates = reservation::Entity::find()
        .filter(reservation::Column::RoomId.eq(room_id))
        .filter(reservation::Column::CheckInDate.lt(stay.check_out()))
        .filter(reservation::Column::CheckOutDate.gt(stay.check_in()))
        .apply_if(exclude, |q, id| q.filter(reservation::Column::Id.ne(id)))
        .all(conn)
        .await
        .map_err(db_err)?;

    Ok(candidates.iter().any(|m| {
        dates_overlap(
            stay.check_in(),
            stay.check_out(),
            m.check_in_date,
            m.check_out_date,
        )
    }))
}

async fn with_guests<C: ConnectionTrait>(
    conn: &C,
    models: Vec<reservation::Model>,
) -> DomainResult<Vec<Reservation>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let guest_models = guest::Entity::find()
        .filter(guest::Column::ReservationId.is_in(ids))
        .order_by_asc(guest::Column::Id)
        .all(conn)
        .await
        .map_err(db_err)?;

    let mut by_reservation: HashMap<i32, Vec<Guest>> = HashMap::new();
    for g in guest_models {
        let reservation_id = g.reservation_id;
        by_reservation
            .entry(reservation_id)
            .or_default()
            .push(guest_to_domain(g)?);
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let guests = by_reservation.remove(&m.id).unwrap_or_default();
            model_to_domain(m, guests)
        })
        .collect())
}

async fn insert_guests<C: ConnectionTrait>(
    conn: &C,
    reservation_id: i32,
    guests: &[Guest],
) -> DomainResult<()> {
    if guests.is_empty() {
        return Ok(());
    }
    guest::Entity::insert_many(guests.iter().map(|g| guest_to_active(reservation_id, g)))
        .exec(conn)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn insert_in(txn: &DatabaseTransaction, record: ReservationRecord) -> DomainResult<Reservation> {
    claim_write_lock(txn, record.room_id).await?;
    bookable_room(txn, record.room_id).await?;
    if overlapping(txn, record.room_id, record.stay, None).await? {
        return Err(conflict(record.room_id, record.stay));
    }

    let now = Utc::now();
    let saved = reservation::ActiveModel {
        id: NotSet,
        room_id: Set(record.room_id),
        check_in_date: Set(record.stay.check_in()),
        check_out_date: Set(record.stay.check_out()),
        total_price_cents: Set(to_minor_units(record.total_price)?),
        emergency_contact_name: Set(record.emergency_contact_name),
        emergency_contact_phone: Set(record.emergency_contact_phone),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await
    .map_err(db_err)?;

    insert_guests(txn, saved.id, &record.guests).await?;
    Ok(model_to_domain(saved, record.guests))
}

async fn replace_in(
    txn: &DatabaseTransaction,
    id: i32,
    record: ReservationRecord,
) -> DomainResult<Reservation> {
    claim_write_lock(txn, record.room_id).await?;
    let existing = reservation::Entity::find_by_id(id)
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or(DomainError::ReservationNotFound(id))?;

    bookable_room(txn, record.room_id).await?;
    if overlapping(txn, record.room_id, record.stay, Some(id)).await? {
        return Err(conflict(record.room_id, record.stay));
    }

    let mut active: reservation::ActiveModel = existing.into();
    active.room_id = Set(record.room_id);
    active.check_in_date = Set(record.stay.check_in());
    active.check_out_date = Set(record.stay.check_out());
    active.total_price_cents = Set(to_minor_units(record.total_price)?);
    active.emergency_contact_name = Set(record.emergency_contact_name);
    active.emergency_contact_phone = Set(record.emergency_contact_phone);
    active.updated_at = Set(Utc::now());
    let updated = active.update(txn).await.map_err(db_err)?;

    guest::Entity::delete_many()
        .filter(guest::Column::ReservationId.eq(id))
        .exec(txn)
        .await
        .map_err(db_err)?;
    insert_guests(txn, id, &record.guests).await?;

    Ok(model_to_domain(updated, record.guests))
}

async fn delete_in(txn: &DatabaseTransaction, id: i32) -> DomainResult<()> {
    guest::Entity::delete_many()
        .filter(guest::Column::ReservationId.eq(id))
        .exec(txn)
        .await
        .map_err(db_err)?;

    let result = reservation::Entity::delete_by_id(id)
        .exec(txn)
        .await
        .map_err(db_err)?;
    if result.rows_affected == 0 {
        return Err(DomainError::ReservationNotFound(id));
    }
    Ok(())
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let Some(model) = model else {
            return Ok(None);
        };
        Ok(with_guests(&self.db, vec![model]).await?.pop())
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        with_guests(&self.db, models).await
    }

    async fn find_by_room(&self, room_id: i32) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::RoomId.eq(room_id))
            .order_by_asc(reservation::Column::CheckInDate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        with_guests(&self.db, models).await
    }

    async fn has_overlap(
        &self,
        room_id: i32,
        stay: StayPeriod,
        exclude: Option<i32>,
    ) -> DomainResult<bool> {
        overlapping(&self.db, room_id, stay, exclude).await
    }

    async fn insert_if_available(&self, record: ReservationRecord) -> DomainResult<Reservation> {
        debug!(room_id = record.room_id, "Inserting reservation");
        let _guard = self.write_guard().await;
        let txn = self.begin().await?;
        let result = insert_in(&txn, record).await;
        finish(txn, result).await
    }

    async fn replace_if_available(
        &self,
        id: i32,
        record: ReservationRecord,
    ) -> DomainResult<Reservation> {
        debug!(reservation_id = id, room_id = record.room_id, "Replacing reservation");
        let _guard = self.write_guard().await;
        let txn = self.begin().await?;
        let result = replace_in(&txn, id, record).await;
        finish(txn, result).await
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        debug!(reservation_id = id, "Deleting reservation");
        let _guard = self.write_guard().await;
        // Deletes write first, so no read-to-write upgrade.
        let txn = self.begin().await?;
        let result = delete_in(&txn, id).await;
        finish(txn, result).await
    }
}
