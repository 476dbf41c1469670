//! Per-provider outbound rate limiting
//!
//! A pool of `N` admission slots where each admitted request holds its slot
//! for one second before it is handed back. Bursts of up to `N` requests go
//! through immediately, and no rolling one-second window ever sees more than
//! `N` admissions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::GeocodingError;

/// Width of the rolling window the request ceiling applies to
const WINDOW: Duration = Duration::from_secs(1);

/// Sliding-window limiter backed by a semaphore and delayed permit release
#[derive(Debug, Clone)]
pub struct RateLimiter {
    slots: Arc<Semaphore>,
    capacity: u32,
}

impl RateLimiter {
    /// Create a limiter admitting `requests_per_second` requests per second
    ///
    /// # Errors
    ///
    /// Returns `GeocodingError::Configuration` if `requests_per_second` is 0.
    pub fn new(requests_per_second: u32) -> Result<Self, GeocodingError> {
        if requests_per_second == 0 {
            return Err(GeocodingError::Configuration(
                "requests_per_second must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            slots: Arc::new(Semaphore::new(requests_per_second as usize)),
            capacity: requests_per_second,
        })
    }

    /// Maximum number of admissions per window
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// How long an admitted request holds its slot
    #[must_use]
    pub const fn window(&self) -> Duration {
        WINDOW
    }

    /// Slots free right now
    #[must_use]
    pub fn available(&self) -> usize {
        self.slots.available_permits()
    }

    /// Wait for a free slot
    ///
    /// The slot is returned to the pool by a background task one window after
    /// admission, regardless of what the caller does next. Must be called
    /// from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `GeocodingError::Cancelled` if `cancel` fires before a slot is
    /// free. No slot is consumed in that case.
    pub async fn admit(&self, cancel: &CancellationToken) -> Result<(), GeocodingError> {
        let permit = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(GeocodingError::Cancelled),
            permit = Arc::clone(&self.slots).acquire_owned() => {
                permit.map_err(|_| GeocodingError::Cancelled)?
            }
        };

        tokio::spawn(async move {
            tokio::time::sleep(WINDOW).await;
            drop(permit);
        });

        trace!(available = self.available(), "Rate limiter slot admitted");
        Ok(())
    }
}
