//! Prometheus exposition
//!
//! HTTP traffic is recorded by [`http_metrics_middleware`]; booking counters
//! (`reservations_created_total`, `reservations_cancelled_total`,
//! `reservation_conflicts_total`) come from the reservation service.

pub mod handlers;
pub mod middleware;

pub use handlers::{prometheus_metrics, MetricsState};
pub use middleware::http_metrics_middleware;
