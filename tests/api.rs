//! End-to-end API tests against an in-memory SQLite database.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use hotel_booking::application::ReservationNotifier;
use hotel_booking::infrastructure::crypto::jwt::JwtConfig;
use hotel_booking::infrastructure::database::migrator::Migrator;
use hotel_booking::infrastructure::notifications::NotificationSettings;
use hotel_booking::shared::clock::{Clock, SystemClock};
use hotel_booking::{
    create_api_router, init_database, ApiServices, DatabaseConfig, MailNotifier,
    SeaOrmRepositoryProvider,
};

struct TestApp {
    router: Router,
    admin_token: String,
}

async fn spawn_app() -> TestApp {
    let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let jwt_config = JwtConfig {
        secret: "integration-test-secret".into(),
        ..JwtConfig::default()
    };
    let repos = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let notifier: Arc<dyn ReservationNotifier> = Arc::new(MailNotifier::new(NotificationSettings {
        enabled: false,
        ..NotificationSettings::default()
    }));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let services = ApiServices::new(repos, notifier, clock, jwt_config.clone());

    services
        .users
        .ensure_default_admin("admin", "admin@example.com", "admin-password")
        .await
        .unwrap();
    let admin_token = services
        .users
        .login("admin", "admin-password")
        .await
        .unwrap()
        .token;

    let handle = PrometheusBuilder::new().build_recorder().handle();
    let router = create_api_router(services, db, jwt_config, handle);

    TestApp {
        router,
        admin_token,
    }
}

impl TestApp {
    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn register_guest(&self, username: &str) -> String {
        let (status, _) = self
            .call(
                Method::POST,
                "/api/v1/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "guest-password"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(json!({ "username": username, "password": "guest-password" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn create_hotel(&self, name: &str, city: &str) -> i64 {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/hotels",
                Some(&self.admin_token),
                Some(json!({ "name": name, "address": "1 Harbor Road", "city": city })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }

    async fn create_room(&self, hotel_id: i64, capacity: u32) -> i64 {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/rooms",
                Some(&self.admin_token),
                Some(json!({
                    "hotel_id": hotel_id,
                    "room_type": "Double",
                    "location": "2nd floor",
                    "capacity": capacity,
                    "base_price": 100.0,
                    "taxes": 12.5
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_i64().unwrap()
    }
}

fn guest(first_name: &str) -> Value {
    json!({
        "first_name": first_name,
        "last_name": "Doe",
        "date_of_birth": "1990-04-12",
        "document_type": "Passport",
        "document_number": "X1234567",
        "gender": "Female",
        "email": format!("{}@example.com", first_name.to_lowercase()),
        "phone": "+1 555 0100"
    })
}

fn booking(room_id: i64, check_in: &str, check_out: &str) -> Value {
    json!({
        "room_id": room_id,
        "check_in_date": check_in,
        "check_out_date": check_out,
        "guests": [guest("Jane")]
    })
}

#[tokio::test]
async fn health_reports_database_up() {
    let app = spawn_app().await;
    let (status, body) = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"]["status"], "ok");
    assert_eq!(body["database"]["backend"], "sqlite");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = spawn_app().await;
    let (status, body) = app
        .call(Method::GET, "/api-doc/openapi.json", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/reservations"].is_object());
}

#[tokio::test]
async fn registered_guest_can_fetch_profile() {
    let app = spawn_app().await;
    let token = app.register_guest("jane").await;

    let (status, body) = app
        .call(Method::GET, "/api/v1/auth/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "jane");
    assert_eq!(body["data"]["role"], "guest");
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = spawn_app().await;
    app.register_guest("jane").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": "jane", "password": "not-the-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn catalog_writes_require_admin() {
    let app = spawn_app().await;
    let hotel = json!({ "name": "Harbor Inn", "address": "1 Harbor Road", "city": "Lisbon" });

    let (status, _) = app
        .call(Method::POST, "/api/v1/hotels", None, Some(hotel.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.register_guest("jane").await;
    let (status, _) = app
        .call(Method::POST, "/api/v1/hotels", Some(&token), Some(hotel))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn reservations_require_authentication() {
    let app = spawn_app().await;
    let (status, _) = app
        .call(Method::GET, "/api/v1/reservations", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn hotel_details_list_rooms_publicly() {
    let app = spawn_app().await;
    let hotel_id = app.create_hotel("Harbor Inn", "Lisbon").await;
    let room_id = app.create_room(hotel_id, 2).await;

    let (status, body) = app
        .call(Method::GET, &format!("/api/v1/hotels/{}", hotel_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rooms"][0]["id"].as_i64(), Some(room_id));
    assert_eq!(body["data"]["rooms"][0]["nightly_rate"].as_f64(), Some(112.5));
}

#[tokio::test]
async fn booking_flow_enforces_overlap_rules() {
    let app = spawn_app().await;
    let token = app.register_guest("jane").await;
    let hotel_id = app.create_hotel("Harbor Inn", "Lisbon").await;
    let room_id = app.create_room(hotel_id, 2).await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/reservations",
            Some(&token),
            Some(booking(room_id, "2099-06-01", "2099-06-04")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["nights"], 3);
    assert_eq!(body["data"]["total_price"].as_f64(), Some(337.5));
    let first_id = body["data"]["id"].as_i64().unwrap();

    // Overlapping stay
    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/reservations",
            Some(&token),
            Some(booking(room_id, "2099-06-03", "2099-06-05")),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Check-in on the previous check-out day
    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/reservations",
            Some(&token),
            Some(booking(room_id, "2099-06-04", "2099-06-06")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .call(
            Method::GET,
            &format!(
                "/api/v1/rooms/{}/availability?check_in=2099-06-02&check_out=2099-06-03",
                room_id
            ),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["available"], false);

    let (status, _) = app
        .call(
            Method::GET,
            "/api/v1/rooms/9999/availability?check_in=2099-06-02&check_out=2099-06-03",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .call(
            Method::GET,
            &format!("/api/v1/rooms/{}/reservations", room_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Cancel, then cancel again
    let uri = format!("/api/v1/reservations/{}", first_id);
    let (status, _) = app.call(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.call(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The freed dates are bookable again
    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/reservations",
            Some(&token),
            Some(booking(room_id, "2099-06-01", "2099-06-04")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn booking_rejects_too_many_guests() {
    let app = spawn_app().await;
    let token = app.register_guest("jane").await;
    let hotel_id = app.create_hotel("Harbor Inn", "Lisbon").await;
    let room_id = app.create_room(hotel_id, 1).await;

    let mut body = booking(room_id, "2099-06-01", "2099-06-04");
    body["guests"] = json!([guest("Jane"), guest("John")]);
    let (status, _) = app
        .call(Method::POST, "/api/v1/reservations", Some(&token), Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn booking_rejects_invalid_guest_email() {
    let app = spawn_app().await;
    let token = app.register_guest("jane").await;
    let hotel_id = app.create_hotel("Harbor Inn", "Lisbon").await;
    let room_id = app.create_room(hotel_id, 2).await;

    let mut body = booking(room_id, "2099-06-01", "2099-06-04");
    body["guests"][0]["email"] = json!("not-an-email");
    let (status, _) = app
        .call(Method::POST, "/api/v1/reservations", Some(&token), Some(body))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn search_filters_by_city_and_dates() {
    let app = spawn_app().await;
    let token = app.register_guest("jane").await;
    let lisbon = app.create_hotel("Harbor Inn", "Lisbon").await;
    let porto = app.create_hotel("River House", "Porto").await;
    let lisbon_room = app.create_room(lisbon, 2).await;
    app.create_room(porto, 2).await;

    let (status, body) = app
        .call(Method::GET, "/api/v1/hotels/search?city=lisbon", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let hits = body["data"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"].as_i64(), Some(lisbon));

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/reservations",
            Some(&token),
            Some(booking(lisbon_room, "2099-06-01", "2099-06-04")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .call(
            Method::GET,
            "/api/v1/hotels/search?check_in=2099-06-02&check_out=2099-06-03",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let hits = body["data"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"].as_i64(), Some(porto));

    let (status, _) = app
        .call(Method::GET, "/api/v1/hotels/search", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hotel_with_active_rooms_cannot_be_deleted() {
    let app = spawn_app().await;
    let hotel_id = app.create_hotel("Harbor Inn", "Lisbon").await;
    let room_id = app.create_room(hotel_id, 2).await;
    let hotel_uri = format!("/api/v1/hotels/{}", hotel_id);

    let (status, _) = app
        .call(Method::DELETE, &hotel_uri, Some(&app.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .call(
            Method::PATCH,
            &format!("/api/v1/rooms/{}/status", room_id),
            Some(&app.admin_token),
            Some(json!({ "is_active": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(Method::DELETE, &hotel_uri, Some(&app.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}
