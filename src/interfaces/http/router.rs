//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    HotelService, ReservationNotifier, ReservationService, RoomService, UserService,
};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, EmptyData, SetStatusRequest};
use crate::interfaces::http::middleware::{auth_middleware, require_admin, AuthState};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{auth, health, hotels, reservations, rooms};
use crate::shared::clock::Clock;

/// Application services shared by all handlers
#[derive(Clone)]
pub struct ApiServices {
    pub hotels: Arc<HotelService>,
    pub rooms: Arc<RoomService>,
    pub reservations: Arc<ReservationService>,
    pub users: Arc<UserService>,
}

impl ApiServices {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        notifier: Arc<dyn ReservationNotifier>,
        clock: Arc<dyn Clock>,
        jwt_config: JwtConfig,
    ) -> Self {
        Self {
            hotels: Arc::new(HotelService::new(repos.clone(), clock.clone())),
            rooms: Arc::new(RoomService::new(repos.clone())),
            reservations: Arc::new(ReservationService::new(repos.clone(), notifier, clock)),
            users: Arc::new(UserService::new(repos, jwt_config)),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        auth::change_password,
        // Hotels
        hotels::list_hotels,
        hotels::search_hotels,
        hotels::get_hotel,
        hotels::list_hotel_rooms,
        hotels::create_hotel,
        hotels::update_hotel,
        hotels::set_hotel_status,
        hotels::delete_hotel,
        // Rooms
        rooms::get_room,
        rooms::room_availability,
        rooms::create_room,
        rooms::update_room,
        rooms::set_room_status,
        // Reservations
        reservations::list_reservations,
        reservations::list_room_reservations,
        reservations::get_reservation,
        reservations::create_reservation,
        reservations::update_reservation,
        reservations::cancel_reservation,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            SetStatusRequest,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UserInfo,
            auth::ChangePasswordRequest,
            // Hotels
            hotels::HotelDto,
            hotels::HotelDetailsDto,
            hotels::HotelRequest,
            // Rooms
            rooms::RoomDto,
            rooms::RoomRequest,
            rooms::AvailabilityDto,
            // Reservations
            reservations::ReservationRequest,
            reservations::ReservationDto,
            reservations::GuestDto,
            reservations::DocumentTypeDto,
            reservations::GenderDto,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service and database health"),
        (name = "Authentication", description = "Registration, login (JWT), profile, password change"),
        (name = "Hotels", description = "Hotel catalog and search"),
        (name = "Rooms", description = "Rooms, pricing and availability"),
        (name = "Reservations", description = "Booking, updating and cancelling stays"),
    ),
    info(
        title = "Hotel Booking API",
        version = "1.0.0",
        description = "REST API for hotels, rooms and reservations",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    services: ApiServices,
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let auth_state = AuthState { jwt_config };
    let require_user = middleware::from_fn_with_state(auth_state.clone(), auth_middleware);

    // ── States ──────────────────────────────────────────────────

    let auth_handlers = auth::AuthHandlerState {
        users: services.users.clone(),
    };
    let hotel_handlers = hotels::HotelHandlerState {
        hotels: services.hotels.clone(),
        rooms: services.rooms.clone(),
    };
    let room_handlers = rooms::RoomHandlerState {
        rooms: services.rooms.clone(),
        reservations: services.reservations.clone(),
    };
    let reservation_handlers = reservations::ReservationHandlerState {
        reservations: services.reservations.clone(),
    };

    // ── Auth ────────────────────────────────────────────────────

    let auth_routes = Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/register", post(auth::register))
        .with_state(auth_handlers.clone());

    let auth_protected_routes = Router::new()
        .route("/api/v1/auth/me", get(auth::get_current_user))
        .route("/api/v1/auth/change-password", put(auth::change_password))
        .layer(require_user.clone())
        .with_state(auth_handlers);

    // ── Hotels & rooms (public reads) ───────────────────────────

    let catalog_routes = Router::new()
        .route("/api/v1/hotels", get(hotels::list_hotels))
        .route("/api/v1/hotels/search", get(hotels::search_hotels))
        .route("/api/v1/hotels/{id}", get(hotels::get_hotel))
        .route("/api/v1/hotels/{id}/rooms", get(hotels::list_hotel_rooms))
        .with_state(hotel_handlers.clone())
        .merge(
            Router::new()
                .route("/api/v1/rooms/{id}", get(rooms::get_room))
                .route(
                    "/api/v1/rooms/{id}/availability",
                    get(rooms::room_availability),
                )
                .with_state(room_handlers.clone()),
        );

    // ── Hotels & rooms (admin writes) ───────────────────────────

    let admin_routes = Router::new()
        .route("/api/v1/hotels", post(hotels::create_hotel))
        .route(
            "/api/v1/hotels/{id}",
            put(hotels::update_hotel).delete(hotels::delete_hotel),
        )
        .route("/api/v1/hotels/{id}/status", patch(hotels::set_hotel_status))
        .with_state(hotel_handlers)
        .merge(
            Router::new()
                .route("/api/v1/rooms", post(rooms::create_room))
                .route("/api/v1/rooms/{id}", put(rooms::update_room))
                .route("/api/v1/rooms/{id}/status", patch(rooms::set_room_status))
                .with_state(room_handlers),
        )
        .layer(middleware::from_fn(require_admin))
        .layer(require_user.clone());

    // ── Reservations (any signed-in user) ───────────────────────

    let reservation_routes = Router::new()
        .route(
            "/api/v1/reservations",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/api/v1/reservations/{id}",
            get(reservations::get_reservation)
                .put(reservations::update_reservation)
                .delete(reservations::cancel_reservation),
        )
        .route(
            "/api/v1/rooms/{id}/reservations",
            get(reservations::list_room_reservations),
        )
        .layer(require_user)
        .with_state(reservation_handlers);

    // ── Operational ─────────────────────────────────────────────

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: prometheus_handle,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(auth_routes)
        .merge(auth_protected_routes)
        .merge(catalog_routes)
        .merge(admin_routes)
        .merge(reservation_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
