//! JSON body extractor with `validator` rules
//!
//! Malformed JSON, a wrong content type or a missing field is a 400.
//! A body that parses but breaks a `#[validate]` rule is a 422 whose
//! message lists every failing field, nested ones as `guests[0].email`.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::ApiResponse;

/// `axum::Json<T>` followed by `T::validate()`.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct RoomRequest {
///     #[validate(length(min = 1, max = 100))]
///     room_type: String,
///     #[validate(range(min = 1))]
///     capacity: u32,
/// }
///
/// async fn create_room(ValidatedJson(body): ValidatedJson<RoomRequest>) { /* ... */ }
/// ```
pub struct ValidatedJson<T>(pub T);

pub enum ValidatedJsonRejection {
    Json(JsonRejection),
    Invalid(ValidationErrors),
}

/// Flatten field errors into `path: message` entries, depth first.
fn collect_field_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in fields {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    out.push(format!("{}: {}", path, msg));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(&format!("{}[{}]", path, index), inner, out);
                }
            }
        }
    }
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Json(rejection) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid JSON: {}", rejection.body_text()),
            ),
            Self::Invalid(errors) => {
                let mut fields = Vec::new();
                collect_field_errors("", &errors, &mut fields);
                let message = if fields.is_empty() {
                    "Validation failed".to_string()
                } else {
                    fields.join("; ")
                };
                (StatusCode::UNPROCESSABLE_ENTITY, message)
            }
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(
        req: axum::extract::Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::Json)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::Invalid)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use axum::routing::post;
    use axum::Router;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Occupant {
        #[validate(email(message = "invalid email format"))]
        email: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct Booking {
        #[validate(length(min = 1, max = 10))]
        room_type: String,
        #[validate(range(min = 1, max = 20))]
        capacity: u32,
        #[validate(nested)]
        #[serde(default)]
        occupants: Vec<Occupant>,
    }

    async fn handler(ValidatedJson(_body): ValidatedJson<Booking>) -> &'static str {
        "ok"
    }

    async fn post_raw(body: impl Into<Body>) -> (StatusCode, Value) {
        let app = Router::new().route("/bookings", post(handler));
        let req = Request::builder()
            .method("POST")
            .uri("/bookings")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn post_json(body: Value) -> (StatusCode, Value) {
        post_raw(body.to_string()).await
    }

    #[tokio::test]
    async fn valid_body_passes_through() {
        let (status, _) = post_json(json!({"room_type": "Double", "capacity": 2})).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = post_raw("not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn missing_field_is_bad_request() {
        let (status, _) = post_json(json!({"room_type": "Double"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rule_violation_is_unprocessable() {
        let (status, body) = post_json(json!({"room_type": "", "capacity": 0})).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("capacity"));
        assert!(message.contains("room_type"));
    }

    #[tokio::test]
    async fn nested_errors_carry_their_path() {
        let (status, body) = post_json(json!({
            "room_type": "Double",
            "capacity": 2,
            "occupants": [{"email": "jane@example.com"}, {"email": "nope"}]
        }))
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "occupants[1].email: invalid email format");
    }
}
