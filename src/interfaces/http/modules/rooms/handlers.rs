//! Room API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{AvailabilityDto, AvailabilityParams, RoomDto, RoomRequest};
use crate::application::{ReservationService, RoomService};
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, SetStatusRequest, ValidatedJson,
};

#[derive(Clone)]
pub struct RoomHandlerState {
    pub rooms: Arc<RoomService>,
    pub reservations: Arc<ReservationService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room details", body = ApiResponse<RoomDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_room(
    State(state): State<RoomHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<RoomDto> {
    let room = state.rooms.get_room(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(room.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/{id}/availability",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID"), AvailabilityParams),
    responses(
        (status = 200, description = "Whether the room can be booked", body = ApiResponse<AvailabilityDto>),
        (status = 400, description = "check_out not after check_in"),
        (status = 404, description = "Not found")
    )
)]
pub async fn room_availability(
    State(state): State<RoomHandlerState>,
    Path(id): Path<i32>,
    Query(params): Query<AvailabilityParams>,
) -> ApiResult<AvailabilityDto> {
    let available = state
        .reservations
        .is_available(id, params.check_in, params.check_out)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(AvailabilityDto {
        room_id: id,
        check_in: params.check_in,
        check_out: params.check_out,
        available,
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    tag = "Rooms",
    request_body = RoomRequest,
    responses(
        (status = 201, description = "Room created", body = ApiResponse<RoomDto>),
        (status = 404, description = "Hotel not found"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_room(
    State(state): State<RoomHandlerState>,
    ValidatedJson(body): ValidatedJson<RoomRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RoomDto>>), ApiError> {
    let room = state
        .rooms
        .create_room(body.into())
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(room.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/rooms/{id}",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID")),
    request_body = RoomRequest,
    responses(
        (status = 200, description = "Room updated", body = ApiResponse<RoomDto>),
        (status = 404, description = "Room or hotel not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_room(
    State(state): State<RoomHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<RoomRequest>,
) -> ApiResult<RoomDto> {
    let room = state
        .rooms
        .update_room(id, body.into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(room.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/rooms/{id}/status",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<RoomDto>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_room_status(
    State(state): State<RoomHandlerState>,
    Path(id): Path<i32>,
    Json(body): Json<SetStatusRequest>,
) -> ApiResult<RoomDto> {
    let room = state
        .rooms
        .set_room_status(id, body.is_active)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(room.into())))
}
