//! Minimum-interval gate between successive calls to one endpoint.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use governor::{Quota, RateLimiter, clock::DefaultClock, state::keyed::DefaultKeyedStateStore};
use tracing::trace;

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Number of waits between two sweeps of idle keys.
const PRUNE_EVERY: usize = 256;

/// Spaces out calls sharing an endpoint key by at least `interval`.
///
/// Each key gets a token bucket holding a single cell that refills once per
/// interval: the first call goes through, later ones wait for the refill.
/// Calls are delayed, never dropped. Distinct keys do not affect each other.
/// Keys idle for longer than the interval are swept periodically.
#[derive(Clone)]
pub struct ThrottleGate {
    limiter: Arc<KeyedLimiter>,
    waits: Arc<AtomicUsize>,
    interval: Duration,
}

impl std::fmt::Debug for ThrottleGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThrottleGate")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl ThrottleGate {
    /// Gate with the given minimum interval, `None` for a zero interval.
    #[must_use]
    pub fn new(interval: Duration) -> Option<Self> {
        let quota = Quota::with_period(interval)?;
        Some(Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            waits: Arc::new(AtomicUsize::new(0)),
            interval,
        })
    }

    /// Minimum interval between two calls with the same key.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until a call for `key` may proceed.
    pub async fn wait(&self, key: &str) {
        let key = key.to_string();
        if self.limiter.check_key(&key).is_err() {
            trace!(endpoint = %key, "throttled");
            self.limiter.until_key_ready(&key).await;
        }

        if (self.waits.fetch_add(1, Ordering::Relaxed) + 1).is_multiple_of(PRUNE_EVERY) {
            self.prune();
        }
    }

    /// Forget keys whose bucket is full again: they behave as unseen keys.
    fn prune(&self) {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        trace!(before, after = self.limiter.len(), "idle endpoints swept");
    }
}
