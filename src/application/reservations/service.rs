//! Reservation manager
//!
//! Validates create / update / cancel requests against the room they target,
//! prices the stay, persists it atomically through the repository and sends
//! the guest a confirmation after the write has committed.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::application::ports::{ReservationConfirmation, ReservationNotifier};
use crate::domain::reservation::{validate_guests, Guest, Reservation, ReservationRecord, StayPeriod};
use crate::domain::room::Room;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::clock::Clock;

/// Caller-supplied reservation contents, shared by create and update
#[derive(Debug, Clone)]
pub struct ReservationInput {
    pub room_id: i32,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guests: Vec<Guest>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    notifier: Arc<dyn ReservationNotifier>,
    clock: Arc<dyn Clock>,
}

impl ReservationService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        notifier: Arc<dyn ReservationNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repos,
            notifier,
            clock,
        }
    }

    // ── Commands ────────────────────────────────────────────────

    /// Book a room.
    ///
    /// Checks run in a fixed order and the first failure wins: room exists,
    /// room is active, check-in not in the past, check-out after check-in,
    /// guests fit the room, guest data valid, no overlapping stay.
    pub async fn create_reservation(&self, input: ReservationInput) -> DomainResult<Reservation> {
        let today = self.clock.today();
        let room = self.bookable_room(input.room_id).await?;

        if input.check_in_date < today {
            return Err(DomainError::InvalidDateRange(format!(
                "check-in {} is in the past",
                input.check_in_date
            )));
        }
        let record = self.prepare(&room, input, today)?;

        let reservation = self
            .repos
            .reservations()
            .insert_if_available(record)
            .await
            .inspect_err(count_conflict)?;

        metrics::counter!("reservations_created_total").increment(1);
        info!(
            reservation_id = reservation.id,
            room_id = reservation.room_id,
            check_in = %reservation.check_in_date,
            check_out = %reservation.check_out_date,
            total_price = %reservation.total_price,
            "Reservation created"
        );

        self.notify(&room, &reservation).await;
        Ok(reservation)
    }

    /// Replace room, dates, guests and contact details of a reservation.
    ///
    /// Same checks as create minus the past check-in rule, so a stay that
    /// has already started can still be edited. The reservation's own
    /// current dates never count as a conflict.
    pub async fn update_reservation(
        &self,
        id: i32,
        input: ReservationInput,
    ) -> DomainResult<Reservation> {
        if self.repos.reservations().find_by_id(id).await?.is_none() {
            return Err(DomainError::ReservationNotFound(id));
        }

        let today = self.clock.today();
        let room = self.bookable_room(input.room_id).await?;
        let record = self.prepare(&room, input, today)?;

        let reservation = self
            .repos
            .reservations()
            .replace_if_available(id, record)
            .await
            .inspect_err(count_conflict)?;

        info!(
            reservation_id = reservation.id,
            room_id = reservation.room_id,
            total_price = %reservation.total_price,
            "Reservation updated"
        );
        Ok(reservation)
    }

    /// Delete a reservation and its guests.
    pub async fn cancel_reservation(&self, id: i32) -> DomainResult<()> {
        self.repos.reservations().delete(id).await?;
        metrics::counter!("reservations_cancelled_total").increment(1);
        info!(reservation_id = id, "Reservation cancelled");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Whether any reservation of the room overlaps `[check_in, check_out)`.
    /// `RoomNotFound` for an unknown room.
    pub async fn is_booked(
        &self,
        room_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> DomainResult<bool> {
        let stay = StayPeriod::new(check_in, check_out)?;
        self.existing_room(room_id).await?;
        self.repos
            .reservations()
            .has_overlap(room_id, stay, None)
            .await
    }

    /// Whether a reservation for `[check_in, check_out)` would be accepted
    /// now: the room is active and not booked for any of those nights.
    pub async fn is_available(
        &self,
        room_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> DomainResult<bool> {
        let booked = self.is_booked(room_id, check_in, check_out).await?;
        let room = self.existing_room(room_id).await?;
        Ok(room.is_active && !booked)
    }

    pub async fn get_reservation(&self, id: i32) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ReservationNotFound(id))
    }

    pub async fn list_reservations(&self) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().find_all().await
    }

    pub async fn list_reservations_for_room(&self, room_id: i32) -> DomainResult<Vec<Reservation>> {
        self.existing_room(room_id).await?;
        self.repos.reservations().find_by_room(room_id).await
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn existing_room(&self, room_id: i32) -> DomainResult<Room> {
        self.repos
            .rooms()
            .find_by_id(room_id)
            .await?
            .ok_or(DomainError::RoomNotFound(room_id))
    }

    async fn bookable_room(&self, room_id: i32) -> DomainResult<Room> {
        let room = self.existing_room(room_id).await?;
        if !room.is_active {
            return Err(DomainError::RoomUnavailable(room_id));
        }
        Ok(room)
    }

    /// Date range, capacity and guest checks, then pricing.
    fn prepare(
        &self,
        room: &Room,
        input: ReservationInput,
        today: NaiveDate,
    ) -> DomainResult<ReservationRecord> {
        let stay = StayPeriod::new(input.check_in_date, input.check_out_date)?;

        if !room.fits(input.guests.len()) {
            return Err(DomainError::CapacityExceeded {
                guests: input.guests.len(),
                capacity: room.capacity,
            });
        }
        validate_guests(&input.guests, today)?;

        Ok(ReservationRecord {
            room_id: room.id,
            stay,
            total_price: stay.price(room.nightly_rate()),
            guests: input.guests,
            emergency_contact_name: non_blank(input.emergency_contact_name),
            emergency_contact_phone: non_blank(input.emergency_contact_phone),
        })
    }

    async fn notify(&self, room: &Room, reservation: &Reservation) {
        let Some(guest) = reservation.guests.first() else {
            return;
        };
        let confirmation = ReservationConfirmation {
            email: guest.email.clone(),
            guest_full_name: guest.full_name(),
            hotel_name: room.hotel_name.clone(),
            check_in: reservation.check_in_date,
            check_out: reservation.check_out_date,
            total_price: reservation.total_price,
        };
        if let Err(e) = self
            .notifier
            .send_reservation_confirmation(&confirmation)
            .await
        {
            warn!(
                reservation_id = reservation.id,
                email = %confirmation.email,
                "Reservation confirmation not sent: {}",
                e
            );
        }
    }
}

fn count_conflict(e: &DomainError) {
    if matches!(e, DomainError::DateConflict { .. }) {
        metrics::counter!("reservation_conflicts_total").increment(1);
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ── Tests ──────────────────────────────────────────────────────
