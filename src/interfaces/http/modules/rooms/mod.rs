//! Room module: room CRUD and availability

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
