//! HTTP REST API interfaces
//!
//! - `common`: response envelope, validated JSON extractor, error mapping
//! - `middleware`: JWT authentication and the admin guard
//! - `modules`: request handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, ApiServices};
