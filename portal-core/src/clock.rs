//! Clock - Injectable Time
//!
//! TigerStyle: every timestamp and every identifier goes through a `Clock`,
//! so tests can pin the date and cross month boundaries on purpose.

use std::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync + Debug {
    /// Current instant.
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

/// A simulated clock for deterministic testing.
///
/// TigerStyle:
/// - Time only moves forward
/// - All time operations are explicit
/// - Clones share the same instant
#[derive(Debug, Clone)]
pub struct SimClock {
    current: Arc<RwLock<DateTime<Utc>>>,
}

impl SimClock {
    /// Create a clock pinned at `start`.
    #[must_use]
    pub fn at(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(RwLock::new(start)),
        }
    }

    /// Advance time by `delta`.
    ///
    /// # Panics
    /// Panics if `delta` is negative.
    pub fn advance(&self, delta: Duration) -> DateTime<Utc> {
        // Precondition
        assert!(
            delta >= Duration::zero(),
            "advance({delta}) must not be negative"
        );

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let old = *current;
        *current = old + delta;

        // Postcondition
        assert!(*current >= old, "time must not go backwards");

        *current
    }

    /// Set time to an absolute instant.
    ///
    /// # Panics
    /// Panics if `instant` is before the current time.
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        // Precondition
        assert!(
            instant >= *current,
            "cannot set time backwards: {instant} < {}",
            *current
        );

        *current = instant;
    }
}

impl Clock for SimClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }
}
