//! Database entities module

pub mod guest;
pub mod hotel;
pub mod reservation;
pub mod room;
pub mod user;

pub use guest::Entity as Guest;
pub use hotel::Entity as Hotel;
pub use reservation::Entity as Reservation;
pub use room::Entity as Room;
pub use user::Entity as User;
