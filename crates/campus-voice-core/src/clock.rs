//! Time source for timestamps.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Stores hold an `Arc<dyn Clock>` so tests can drive time explicitly.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
