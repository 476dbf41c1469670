//! Application layer - Use cases and orchestration
//!
//! Hosts the geocoding service that puts an expiring cache in front of the
//! selected upstream provider, and the cache port it talks through.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
