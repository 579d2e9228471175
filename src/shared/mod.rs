pub mod clock;
pub mod errors;
pub mod money;
pub mod shutdown;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::DomainError;
pub use shutdown::{ShutdownCoordinator, ShutdownSignal};
