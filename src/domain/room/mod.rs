//! Room aggregate

pub mod model;
pub mod repository;

pub use model::{Room, RoomDraft};
pub use repository::RoomRepository;
