//! Domain layer for the geocoding gateway
//!
//! Contains the normalized address schema, the geocode outcome envelope,
//! provider status snapshots and the provider discriminator.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
