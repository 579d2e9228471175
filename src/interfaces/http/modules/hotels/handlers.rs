//! Hotel API handlers
//!
//! Reads are public; mutations sit behind the admin guard.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{HotelDetailsDto, HotelDto, HotelRequest, ListHotelsParams, SearchHotelsParams};
use crate::application::{HotelService, RoomService};
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, EmptyData, SetStatusRequest, ValidatedJson,
};
use crate::interfaces::http::modules::rooms::{ListRoomsParams, RoomDto};

#[derive(Clone)]
pub struct HotelHandlerState {
    pub hotels: Arc<HotelService>,
    pub rooms: Arc<RoomService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/hotels",
    tag = "Hotels",
    params(ListHotelsParams),
    responses(
        (status = 200, description = "Hotels ordered by id", body = ApiResponse<Vec<HotelDto>>)
    )
)]
pub async fn list_hotels(
    State(state): State<HotelHandlerState>,
    Query(params): Query<ListHotelsParams>,
) -> ApiResult<Vec<HotelDto>> {
    let hotels = state
        .hotels
        .list_hotels(params.include_inactive)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        hotels.into_iter().map(HotelDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/hotels/search",
    tag = "Hotels",
    params(SearchHotelsParams),
    responses(
        (status = 200, description = "Active hotels matching all filters", body = ApiResponse<Vec<HotelDto>>),
        (status = 400, description = "No filter, bad guest count or bad date range")
    )
)]
pub async fn search_hotels(
    State(state): State<HotelHandlerState>,
    Query(params): Query<SearchHotelsParams>,
) -> ApiResult<Vec<HotelDto>> {
    let hotels = state
        .hotels
        .search_hotels(params.into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        hotels.into_iter().map(HotelDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/hotels/{id}",
    tag = "Hotels",
    params(("id" = i32, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Hotel with its rooms", body = ApiResponse<HotelDetailsDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_hotel(
    State(state): State<HotelHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<HotelDetailsDto> {
    let details = state.hotels.get_hotel(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(details.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/hotels/{id}/rooms",
    tag = "Hotels",
    params(("id" = i32, Path, description = "Hotel ID"), ListRoomsParams),
    responses(
        (status = 200, description = "Rooms of the hotel", body = ApiResponse<Vec<RoomDto>>),
        (status = 404, description = "Hotel not found")
    )
)]
pub async fn list_hotel_rooms(
    State(state): State<HotelHandlerState>,
    Path(id): Path<i32>,
    Query(params): Query<ListRoomsParams>,
) -> ApiResult<Vec<RoomDto>> {
    let rooms = state
        .rooms
        .list_rooms(id, params.include_inactive)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        rooms.into_iter().map(RoomDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/hotels",
    tag = "Hotels",
    request_body = HotelRequest,
    responses(
        (status = 201, description = "Hotel created", body = ApiResponse<HotelDto>),
        (status = 403, description = "Admin only"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_hotel(
    State(state): State<HotelHandlerState>,
    ValidatedJson(body): ValidatedJson<HotelRequest>,
) -> Result<(StatusCode, Json<ApiResponse<HotelDto>>), ApiError> {
    let hotel = state
        .hotels
        .create_hotel(body.into())
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(hotel.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/hotels/{id}",
    tag = "Hotels",
    params(("id" = i32, Path, description = "Hotel ID")),
    request_body = HotelRequest,
    responses(
        (status = 200, description = "Hotel updated", body = ApiResponse<HotelDto>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_hotel(
    State(state): State<HotelHandlerState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<HotelRequest>,
) -> ApiResult<HotelDto> {
    let hotel = state
        .hotels
        .update_hotel(id, body.into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(hotel.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/hotels/{id}/status",
    tag = "Hotels",
    params(("id" = i32, Path, description = "Hotel ID")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<HotelDto>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_hotel_status(
    State(state): State<HotelHandlerState>,
    Path(id): Path<i32>,
    Json(body): Json<SetStatusRequest>,
) -> ApiResult<HotelDto> {
    let hotel = state
        .hotels
        .set_hotel_status(id, body.is_active)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(hotel.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/hotels/{id}",
    tag = "Hotels",
    params(("id" = i32, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Hotel still has active rooms")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_hotel(
    State(state): State<HotelHandlerState>,
    Path(id): Path<i32>,
) -> ApiResult<EmptyData> {
    state.hotels.delete_hotel(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
