//! Reservation API handlers
//!
//! All routes require an authenticated user. Business rules live in
//! `ReservationService`; these handlers only translate.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{ReservationDto, ReservationRequest};
use crate::application::ReservationService;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson,
};

#[derive(Clone)]
pub struct ReservationHandlerState {
    pub reservations: Arc<ReservationService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    responses(
        (status = 200, description = "All reservations", body = ApiResponse<Vec<ReservationDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_reservations(
    State(state): State<ReservationHandlerState>,
) -> ApiResult<Vec<ReservationDto>> {
    let reservations = state
        .reservations
        .list_reservations()
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(ReservationDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}/reservations",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Reservations of the room ordered by check-in", body = ApiResponse<Vec<ReservationDto>>),
        (status = 404, description = "Room not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_room_reservations(
    State(state): State<ReservationHandlerState>,
    Path(room_id): Path<i32>,
) -> ApiResult<Vec<ReservationDto>> {
    let reservations = state
        .reservations
        .list_reservations_for_room(room_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(ReservationDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation with guests", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_reservation(
    State(state): State<ReservationHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<ReservationDto> {
    let reservation = state
        .reservations
        .get_reservation(id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = ReservationRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Bad dates, capacity exceeded or invalid guest data"),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Room inactive or already booked for these dates")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_reservation(
    State(state): State<ReservationHandlerState>,
    ValidatedJson(body): ValidatedJson<ReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let reservation = state
        .reservations
        .create_reservation(body.into())
        .await
        .map_err(domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(reservation.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body = ReservationRequest,
    responses(
        (status = 200, description = "Reservation replaced", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation or room not found"),
        (status = 409, description = "Dates overlap another reservation")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_reservation(
    State(state): State<ReservationHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<ReservationRequest>,
) -> ApiResult<ReservationDto> {
    let reservation = state
        .reservations
        .update_reservation(id, body.into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Cancelled", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_reservation(
    State(state): State<ReservationHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<EmptyData> {
    state
        .reservations
        .cancel_reservation(id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
