//! Plain configuration data (DTOs) read by the registry.

pub mod protocol;
pub mod ssl;

pub use protocol::*;
pub use ssl::*;
