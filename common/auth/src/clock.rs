use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

/// Source of the current Unix time used for `exp` arithmetic.
pub trait Clock: Send + Sync {
    /// Current time in whole Unix seconds.
    fn now_unix(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn at_unix(seconds: i64) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(seconds.saturating_mul(1000))),
        }
    }

    /// Start from the current wall-clock time.
    pub fn starting_now() -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(Utc::now().timestamp_millis())),
        }
    }

    pub fn set_unix(&self, seconds: i64) {
        self.millis
            .store(seconds.saturating_mul(1000), Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.add_millis(i64::try_from(by.as_millis()).unwrap_or(i64::MAX));
    }

    pub fn advance_secs(&self, seconds: i64) {
        self.add_millis(seconds.saturating_mul(1000));
    }

    fn add_millis(&self, delta: i64) {
        let _ = self
            .millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_add(delta))
            });
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.millis.load(Ordering::SeqCst).div_euclid(1000)
    }
}
