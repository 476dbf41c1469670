//! Per-provider request counters

use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

/// Point-in-time copy of [`ProviderMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricsSnapshot {
    /// Requests started since the last reset
    pub requests: u64,
    /// Upstream failures since the last reset
    pub errors: u64,
    /// Cumulative time spent on requests that reached the upstream
    pub total_time: Duration,
    /// When the most recent request started
    pub last_request: Option<DateTime<Utc>>,
}

impl MetricsSnapshot {
    /// Mean seconds per request, 0 when no request has been recorded
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_time(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.total_time.as_secs_f64() / self.requests as f64
        }
    }

    /// Seconds elapsed since the most recent request, 0 when none
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn seconds_since_last_request(&self) -> f64 {
        self.last_request.map_or(0.0, |last| {
            (Utc::now() - last).num_milliseconds().max(0) as f64 / 1000.0
        })
    }
}

/// Counters shared by every call on one provider instance
///
/// Writers take the lock only for the duration of a counter update, never
/// across an upstream call.
#[derive(Debug, Default)]
pub struct ProviderMetrics {
    inner: RwLock<MetricsSnapshot>,
}

impl ProviderMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a new request and stamp it as the most recent
    pub fn record_request(&self) {
        let mut metrics = self.inner.write();
        metrics.requests += 1;
        metrics.last_request = Some(Utc::now());
    }

    /// Count an upstream failure
    pub fn record_error(&self) {
        self.inner.write().errors += 1;
    }

    /// Accumulate time spent on one request
    pub fn record_elapsed(&self, elapsed: Duration) {
        self.inner.write().total_time += elapsed;
    }

    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        *self.inner.read()
    }

    /// Zero every counter
    pub fn reset(&self) {
        *self.inner.write() = MetricsSnapshot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = ProviderMetrics::new();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests, 0);
        assert_eq!(snapshot.errors, 0);
        assert_eq!(snapshot.total_time, Duration::ZERO);
        assert!(snapshot.last_request.is_none());
        assert!(snapshot.average_time().abs() < f64::EPSILON);
        assert!(snapshot.seconds_since_last_request().abs() < f64::EPSILON);
    }

    #[test]
    fn test_record_and_reset() {
        let metrics = ProviderMetrics::new();
        metrics.record_request();
        metrics.record_request();
        metrics.record_error();
        metrics.record_elapsed(Duration::from_millis(300));
        metrics.record_elapsed(Duration::from_millis(100));

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests, 2);
        assert_eq!(snapshot.errors, 1);
        assert_eq!(snapshot.total_time, Duration::from_millis(400));
        assert!(snapshot.last_request.is_some());
        assert!((snapshot.average_time() - 0.2).abs() < 1e-9);

        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let metrics = Arc::new(ProviderMetrics::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        metrics.record_request();
                        metrics.record_error();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests, 2000);
        assert_eq!(snapshot.errors, 2000);
    }
}
