//! `GET /health`: liveness plus a database round trip

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct HealthState {
    pub db: DatabaseConnection,
    pub started_at: Arc<Instant>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` or `degraded`
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    /// `ok` or `error`
    pub status: String,
    /// `sqlite`, `postgres` or `mysql`
    pub backend: String,
    pub latency_ms: Option<u64>,
}

fn backend_name(backend: DatabaseBackend) -> &'static str {
    match backend {
        DatabaseBackend::Sqlite => "sqlite",
        DatabaseBackend::Postgres => "postgres",
        _ => "mysql",
    }
}

async fn probe_database(db: &DatabaseConnection) -> ComponentHealth {
    let backend = db.get_database_backend();
    let started = Instant::now();
    let result = db
        .execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await;

    let (status, latency_ms) = match result {
        Ok(_) => ("ok", Some(started.elapsed().as_millis() as u64)),
        Err(e) => {
            warn!("Health check database probe failed: {}", e);
            ("error", None)
        }
    };
    ComponentHealth {
        status: status.to_string(),
        backend: backend_name(backend).to_string(),
        latency_ms,
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are up", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = probe_database(&state.db).await;
    let healthy = database.status == "ok";

    let body = HealthResponse {
        status: if healthy { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database,
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}
