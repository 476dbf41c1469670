//! Cache implementations
//!
//! - `MokaCache`: in-memory response cache with soft and hard expiry
//! - `spawn_cache_sweeper`: periodic purge of expired entries

mod moka_cache;
mod sweeper;

pub use moka_cache::{MokaCache, MokaCacheConfig};
pub use sweeper::spawn_cache_sweeper;
