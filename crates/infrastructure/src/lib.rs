//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the moka-backed
//! response cache and its sweeper, configuration loading, and tracing setup.

pub mod cache;
pub mod config;
pub mod telemetry;

pub use cache::{MokaCache, MokaCacheConfig, spawn_cache_sweeper};
pub use config::{AppConfig, CacheConfig, GeocodingAppConfig, ServerConfig};
pub use telemetry::init_tracing;
