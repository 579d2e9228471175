//! In-memory storage implementation

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::hotel::{Hotel, HotelDraft, HotelRepository};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::reservation::{
    Reservation, ReservationRecord, ReservationRepository, StayPeriod,
};
use crate::domain::room::{Room, RoomDraft, RoomRepository};
use crate::domain::user::{CreateUserDto, User, UserRepository};
use crate::domain::{DomainError, DomainResult};

/// In-memory storage for development and testing
///
/// Implements every repository trait on one struct so that cascades
/// (hotel → rooms → reservations) see the same data. Writes that must be
/// atomic (overlap check + reservation write, uniqueness check + user
/// insert, cascading delete) hold `write_lock`.
pub struct InMemoryStorage {
    hotels: DashMap<i32, Hotel>,
    rooms: DashMap<i32, Room>,
    reservations: DashMap<i32, Reservation>,
    users: DashMap<String, User>,
    hotel_counter: AtomicI32,
    room_counter: AtomicI32,
    reservation_counter: AtomicI32,
    write_lock: Mutex<()>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            hotels: DashMap::new(),
            rooms: DashMap::new(),
            reservations: DashMap::new(),
            users: DashMap::new(),
            hotel_counter: AtomicI32::new(1),
            room_counter: AtomicI32::new(1),
            reservation_counter: AtomicI32::new(1),
            write_lock: Mutex::new(()),
        }
    }

    fn hotel_not_found(id: i32) -> DomainError {
        DomainError::NotFound {
            entity: "Hotel",
            field: "id",
            value: id.to_string(),
        }
    }

    /// Room with the current name of its hotel filled in
    fn with_hotel_name(&self, mut room: Room) -> Room {
        room.hotel_name = self
            .hotels
            .get(&room.hotel_id)
            .map(|h| h.name.clone())
            .unwrap_or_default();
        room
    }

    fn overlapping(&self, room_id: i32, stay: StayPeriod, exclude: Option<i32>) -> bool {
        self.reservations.iter().any(|r| {
            r.room_id == room_id && Some(r.id) != exclude && r.stay().overlaps(&stay)
        })
    }

    /// Room must exist and be active at write time.
    fn ensure_bookable(&self, room_id: i32) -> DomainResult<()> {
        match self.rooms.get(&room_id) {
            None => Err(DomainError::RoomNotFound(room_id)),
            Some(room) if !room.is_active => Err(DomainError::RoomUnavailable(room_id)),
            Some(_) => Ok(()),
        }
    }

    fn conflict(room_id: i32, stay: StayPeriod) -> DomainError {
        DomainError::DateConflict {
            room_id,
            check_in: stay.check_in(),
            check_out: stay.check_out(),
        }
    }

    fn sorted<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
        items.sort_by_key(key);
        items
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryStorage {
    fn hotels(&self) -> &dyn HotelRepository {
        self
    }

    fn rooms(&self) -> &dyn RoomRepository {
        self
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        self
    }

    fn users(&self) -> &dyn UserRepository {
        self
    }
}

// ── Hotels ──────────────────────────────────────────────────────

#[async_trait]
impl HotelRepository for InMemoryStorage {
    async fn find_all(&self, include_inactive: bool) -> DomainResult<Vec<Hotel>> {
        let hotels = self
            .hotels
            .iter()
            .filter(|h| include_inactive || h.is_active)
            .map(|h| h.value().clone())
            .collect();
        Ok(Self::sorted(hotels, |h: &Hotel| h.id))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Hotel>> {
        Ok(self.hotels.get(&id).map(|h| h.clone()))
    }

    async fn create(&self, draft: HotelDraft) -> DomainResult<Hotel> {
        let now = Utc::now();
        let hotel = Hotel {
            id: self.hotel_counter.fetch_add(1, Ordering::SeqCst),
            name: draft.name,
            address: draft.address,
            city: draft.city,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.hotels.insert(hotel.id, hotel.clone());
        Ok(hotel)
    }

    async fn update(&self, id: i32, draft: HotelDraft) -> DomainResult<Hotel> {
        let mut hotel = self
            .hotels
            .get_mut(&id)
            .ok_or_else(|| Self::hotel_not_found(id))?;
        hotel.name = draft.name;
        hotel.address = draft.address;
        hotel.city = draft.city;
        hotel.updated_at = Utc::now();
        Ok(hotel.clone())
    }

    async fn set_active(&self, id: i32, is_active: bool) -> DomainResult<Hotel> {
        let mut hotel = self
            .hotels
            .get_mut(&id)
            .ok_or_else(|| Self::hotel_not_found(id))?;
        hotel.is_active = is_active;
        hotel.updated_at = Utc::now();
        Ok(hotel.clone())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let _guard = self.write_lock.lock().await;
        self.hotels
            .remove(&id)
            .ok_or_else(|| Self::hotel_not_found(id))?;

        let room_ids: Vec<i32> = self
            .rooms
            .iter()
            .filter(|r| r.hotel_id == id)
            .map(|r| r.id)
            .collect();
        self.reservations.retain(|_, r| !room_ids.contains(&r.room_id));
        self.rooms.retain(|_, r| r.hotel_id != id);
        Ok(())
    }
}

// ── Rooms ───────────────────────────────────────────────────────

#[async_trait]
impl RoomRepository for InMemoryStorage {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        let room = self.rooms.get(&id).map(|r| r.clone());
        Ok(room.map(|r| self.with_hotel_name(r)))
    }

    async fn find_by_hotel(&self, hotel_id: i32, active_only: bool) -> DomainResult<Vec<Room>> {
        let rooms: Vec<Room> = self
            .rooms
            .iter()
            .filter(|r| r.hotel_id == hotel_id && (!active_only || r.is_active))
            .map(|r| r.value().clone())
            .collect();
        Ok(Self::sorted(rooms, |r: &Room| r.id)
            .into_iter()
            .map(|r| self.with_hotel_name(r))
            .collect())
    }

    async fn create(&self, draft: RoomDraft) -> DomainResult<Room> {
        if !self.hotels.contains_key(&draft.hotel_id) {
            return Err(Self::hotel_not_found(draft.hotel_id));
        }
        let now = Utc::now();
        let room = Room {
            id: self.room_counter.fetch_add(1, Ordering::SeqCst),
            hotel_id: draft.hotel_id,
            hotel_name: String::new(),
            room_type: draft.room_type,
            location: draft.location,
            capacity: draft.capacity,
            base_price: draft.base_price,
            taxes: draft.taxes,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.rooms.insert(room.id, room.clone());
        Ok(self.with_hotel_name(room))
    }

    async fn update(&self, id: i32, draft: RoomDraft) -> DomainResult<Room> {
        if !self.rooms.contains_key(&id) {
            return Err(DomainError::RoomNotFound(id));
        }
        if !self.hotels.contains_key(&draft.hotel_id) {
            return Err(Self::hotel_not_found(draft.hotel_id));
        }
        let updated = {
            let mut room = self
                .rooms
                .get_mut(&id)
                .ok_or(DomainError::RoomNotFound(id))?;
            room.hotel_id = draft.hotel_id;
            room.room_type = draft.room_type;
            room.location = draft.location;
            room.capacity = draft.capacity;
            room.base_price = draft.base_price;
            room.taxes = draft.taxes;
            room.updated_at = Utc::now();
            room.clone()
        };
        Ok(self.with_hotel_name(updated))
    }

    async fn set_active(&self, id: i32, is_active: bool) -> DomainResult<Room> {
        let _guard = self.write_lock.lock().await;
        let updated = {
            let mut room = self
                .rooms
                .get_mut(&id)
                .ok_or(DomainError::RoomNotFound(id))?;
            room.is_active = is_active;
            room.updated_at = Utc::now();
            room.clone()
        };
        Ok(self.with_hotel_name(updated))
    }
}

// ── Reservations ────────────────────────────────────────────────

#[async_trait]
impl ReservationRepository for InMemoryStorage {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        Ok(self.reservations.get(&id).map(|r| r.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        let all = self.reservations.iter().map(|r| r.value().clone()).collect();
        Ok(Self::sorted(all, |r: &Reservation| r.id))
    }

    async fn find_by_room(&self, room_id: i32) -> DomainResult<Vec<Reservation>> {
        let for_room = self
            .reservations
            .iter()
            .filter(|r| r.room_id == room_id)
            .map(|r| r.value().clone())
            .collect();
        Ok(Self::sorted(for_room, |r: &Reservation| r.check_in_date))
    }

    async fn has_overlap(
        &self,
        room_id: i32,
        stay: StayPeriod,
        exclude: Option<i32>,
    ) -> DomainResult<bool> {
        Ok(self.overlapping(room_id, stay, exclude))
    }

    async fn insert_if_available(&self, record: ReservationRecord) -> DomainResult<Reservation> {
        let _guard = self.write_lock.lock().await;
        self.ensure_bookable(record.room_id)?;
        if self.overlapping(record.room_id, record.stay, None) {
            return Err(Self::conflict(record.room_id, record.stay));
        }

        let now = Utc::now();
        let reservation = Reservation {
            id: self.reservation_counter.fetch_add(1, Ordering::SeqCst),
            room_id: record.room_id,
            check_in_date: record.stay.check_in(),
            check_out_date: record.stay.check_out(),
            total_price: record.total_price,
            guests: record.guests,
            emergency_contact_name: record.emergency_contact_name,
            emergency_contact_phone: record.emergency_contact_phone,
            created_at: now,
            updated_at: now,
        };
        self.reservations.insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    async fn replace_if_available(
        &self,
        id: i32,
        record: ReservationRecord,
    ) -> DomainResult<Reservation> {
        let _guard = self.write_lock.lock().await;
        let created_at = self
            .reservations
            .get(&id)
            .map(|r| r.created_at)
            .ok_or(DomainError::ReservationNotFound(id))?;
        self.ensure_bookable(record.room_id)?;
        if self.overlapping(record.room_id, record.stay, Some(id)) {
            return Err(Self::conflict(record.room_id, record.stay));
        }

        let reservation = Reservation {
            id,
            room_id: record.room_id,
            check_in_date: record.stay.check_in(),
            check_out_date: record.stay.check_out(),
            total_price: record.total_price,
            guests: record.guests,
            emergency_contact_name: record.emergency_contact_name,
            emergency_contact_phone: record.emergency_contact_phone,
            created_at,
            updated_at: Utc::now(),
        };
        self.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let _guard = self.write_lock.lock().await;
        self.reservations
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::ReservationNotFound(id))
    }
}

// ── Users ───────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for InMemoryStorage {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let _guard = self.write_lock.lock().await;
        let taken = self
            .users
            .iter()
            .any(|u| u.username == dto.username || u.email == dto.email);
        if taken {
            return Err(DomainError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: dto.username,
            email: dto.email,
            password_hash: dto.password_hash,
            role: dto.role,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.value().clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.value().clone()))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn update_user_password(&self, id: &str, new_password_hash: &str) -> DomainResult<()> {
        let mut user = self.users.get_mut(id).ok_or_else(|| DomainError::NotFound {
            entity: "User",
            field: "id",
            value: id.to_string(),
        })?;
        user.password_hash = new_password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn record_login(&self, id: &str) -> DomainResult<()> {
        if let Some(mut user) = self.users.get_mut(id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn count_users(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }
}
