//! Identity module: user management & authentication
//!
//! Contains the `UserService` which orchestrates login, registration,
//! password changes and the bootstrap admin account.

pub mod service;

pub use service::{AuthResult, UserService};
