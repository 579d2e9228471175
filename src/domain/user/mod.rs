//! User aggregate
//!
//! Contains the User entity, its creation DTO, and repository interface.

pub mod model;
pub mod repository;

pub use model::{CreateUserDto, User, UserRole};
pub use repository::UserRepository;
