//! Token-bucket rate limiter
//!
//! One bucket per client key. Tokens are fixed-point integers (1 token =
//! `TOKEN_SCALE` units) so refill and consumption stay on atomics; taking a
//! token is a CAS loop. Buckets idle past the TTL are removed on the next
//! lookup.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

const TOKEN_SCALE: u64 = 1_000_000;
const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Remove buckets not used for 5 minutes.
const BUCKET_TTL_NANOS: u64 = 5 * 60 * NANOS_PER_SECOND;

struct Bucket {
    max_tokens: u64,
    /// Scaled tokens added per second (rate * `TOKEN_SCALE`).
    refill_per_second: u64,
    tokens: AtomicU64,
    /// Nanoseconds since the limiter epoch.
    last_refill: AtomicU64,
    last_access: AtomicU64,
}

impl Bucket {
    fn new(refill_per_second: u64, max_tokens: u64, now: u64) -> Self {
        Self {
            max_tokens,
            refill_per_second,
            tokens: AtomicU64::new(max_tokens),
            last_refill: AtomicU64::new(now),
            last_access: AtomicU64::new(now),
        }
    }

    fn allow(&self, now: u64) -> bool {
        self.last_access.store(now, Ordering::Relaxed);
        self.refill(now);
        self.try_consume_one()
    }

    fn refill(&self, now: u64) {
        let last = self.last_refill.load(Ordering::Relaxed);
        let elapsed = now.saturating_sub(last);
        if elapsed == 0 {
            return;
        }

        // Wide arithmetic: elapsed_ns * rate / ns_per_s. Computing a
        // per-nanosecond rate in integers would floor to zero for any rate
        // below one token per nanosecond.
        let to_add = u64::try_from(
            u128::from(elapsed) * u128::from(self.refill_per_second)
                / u128::from(NANOS_PER_SECOND),
        )
        .unwrap_or(u64::MAX);
        if to_add == 0 {
            // Keep last_refill so sub-token elapsed time still accrues.
            return;
        }

        if self
            .last_refill
            .compare_exchange(last, now, Ordering::Relaxed, Ordering::Relaxed)
            .is_err()
        {
            // Another thread claimed this elapsed window.
            return;
        }

        let mut current = self.tokens.load(Ordering::Relaxed);
        loop {
            let updated = current.saturating_add(to_add).min(self.max_tokens);
            match self
                .tokens
                .compare_exchange(current, updated, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }

    fn try_consume_one(&self) -> bool {
        let mut current = self.tokens.load(Ordering::Relaxed);
        loop {
            if current < TOKEN_SCALE {
                return false;
            }
            match self.tokens.compare_exchange(
                current,
                current - TOKEN_SCALE,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }
}

pub struct RateLimiter {
    buckets: Mutex<HashMap<String, Arc<Bucket>>>,
    refill_per_second: u64,
    max_tokens: u64,
    epoch: Instant,
}

impl RateLimiter {
    /// `per_second` is the sustained rate, `burst` the bucket capacity.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(per_second: f64, burst: f64) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            refill_per_second: (per_second.max(0.0) * TOKEN_SCALE as f64) as u64,
            max_tokens: (burst.max(1.0) * TOKEN_SCALE as f64) as u64,
            epoch: Instant::now(),
        }
    }

    /// Check whether one request from `key` is allowed right now.
    pub fn allow(&self, key: &str) -> bool {
        let now = self.now_nanos();

        let bucket = {
            let mut buckets = self.lock();
            buckets.retain(|_, bucket| {
                now.saturating_sub(bucket.last_access.load(Ordering::Relaxed)) <= BUCKET_TTL_NANOS
            });
            Arc::clone(buckets.entry(key.to_string()).or_insert_with(|| {
                Arc::new(Bucket::new(self.refill_per_second, self.max_tokens, now))
            }))
        };

        bucket.allow(now)
    }

    /// Number of live buckets (distinct keys seen recently).
    pub fn tracked_keys(&self) -> usize {
        self.lock().len()
    }

    fn now_nanos(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Bucket>>> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
