//! Shared HTTP types: the response envelope, the validated JSON extractor
//! and the mapping from domain errors to status codes.

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;

pub use validated_json::ValidatedJson;

/// Standard API response envelope
///
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty payload for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// Body of the `PATCH .../status` endpoints
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    pub is_active: bool,
}

pub type ApiError = (StatusCode, Json<ApiResponse<()>>);
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::RoomNotFound(_)
        | DomainError::ReservationNotFound(_)
        | DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::InvalidDateRange(_)
        | DomainError::CapacityExceeded { .. }
        | DomainError::InvalidGuestData(_)
        | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::RoomUnavailable(_)
        | DomainError::DateConflict { .. }
        | DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert a domain error into an error response. Storage failures are
/// logged and their details kept out of the body.
pub fn domain_error(err: DomainError) -> ApiError {
    let status = status_for(&err);
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Request failed: {}", err);
        "Internal server error".to_string()
    } else {
        err.to_string()
    };
    (status, Json(ApiResponse::error(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn core_errors_map_to_expected_statuses() {
        let day = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let cases = [
            (DomainError::RoomNotFound(1), StatusCode::NOT_FOUND),
            (DomainError::ReservationNotFound(1), StatusCode::NOT_FOUND),
            (DomainError::RoomUnavailable(1), StatusCode::CONFLICT),
            (DomainError::InvalidDateRange("x".into()), StatusCode::BAD_REQUEST),
            (
                DomainError::CapacityExceeded {
                    guests: 3,
                    capacity: 2,
                },
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::InvalidGuestData("x".into()), StatusCode::BAD_REQUEST),
            (
                DomainError::DateConflict {
                    room_id: 1,
                    check_in: day,
                    check_out: day,
                },
                StatusCode::CONFLICT,
            ),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
        ];
        for (err, status) in cases {
            assert_eq!(status_for(&err), status, "{}", err);
        }
    }

    #[test]
    fn storage_details_stay_out_of_the_body() {
        let (status, Json(body)) = domain_error(DomainError::Storage("disk I/O error".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }

    #[test]
    fn envelope_shape() {
        let ok = serde_json::to_value(ApiResponse::success(1)).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "data": 1}));
        let err = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(
            err,
            serde_json::json!({"success": false, "data": null, "error": "nope"})
        );
    }
}
