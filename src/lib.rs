//! # Hotel Booking
//!
//! REST API for hotels, rooms and reservations.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, value types and repository traits
//! - **application**: Use cases (reservation manager, catalog, identity)
//! - **infrastructure**: Database, in-memory storage, crypto, mail notifications
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Errors, clock, money helpers, shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryStorage, MailNotifier, SeaOrmRepositoryProvider,
};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiServices};
