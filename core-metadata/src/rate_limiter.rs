//! Per-Provider Rate Limiter
//!
//! Every outbound provider call waits here first, keyed by the agent name.
//!
//! ## Scheduling
//!
//! The limiter keeps, per provider, the next instant a call may start. A caller
//! reserves its slot while holding the lock (no await happens under it), then
//! sleeps until that slot outside the lock. Concurrent callers therefore queue
//! behind each other's *scheduled* times rather than wall-clock `now`, so a
//! burst of N callers is spread over N intervals. Different providers only
//! share the lock for the instant of the reservation.
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::rate_limiter::RateLimiter;
//! use core_runtime::config::RateLimitConfig;
//!
//! let limiter = RateLimiter::new(RateLimitConfig::default());
//! limiter.wait_for_rate_limit("musicbrainz").await;
//! // safe to call MusicBrainz now
//! ```

use core_runtime::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

pub struct RateLimiter {
    config: RateLimitConfig,
    next_slots: Mutex<HashMap<String, Instant>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            next_slots: Mutex::new(HashMap::new()),
        }
    }

    /// Minimum spacing configured for `provider`
    pub fn interval_for(&self, provider: &str) -> Duration {
        self.config.interval_for(provider)
    }

    /// Suspends until it is safe to call `provider`
    ///
    /// Never fails. Dropping the returned future after the reservation keeps
    /// the slot consumed, which only ever makes later callers wait longer.
    pub async fn wait_for_rate_limit(&self, provider: &str) {
        let scheduled = self.reserve_slot(provider);
        let now = Instant::now();

        if scheduled > now {
            debug!(
                provider = %provider,
                wait_ms = (scheduled - now).as_millis() as u64,
                "Rate limiting: waiting for provider slot"
            );
            tokio::time::sleep_until(scheduled).await;
        }
    }

    fn reserve_slot(&self, provider: &str) -> Instant {
        let interval = self.interval_for(provider);
        let mut slots = self
            .next_slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let now = Instant::now();
        let scheduled = match slots.get(provider) {
            Some(&next) if next > now => next,
            _ => now,
        };
        slots.insert(provider.to_string(), scheduled + interval);
        scheduled
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
