//! Time sources.
//!
//! Every store reads the current time through a [`Clock`]. Production code
//! uses [`SystemClock`]; tests swap in a [`FixedClock`] and move it forward
//! explicitly.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};

/// A replaceable source of "now".
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to the store.
#[derive(Debug, Clone)]
pub struct FixedClock {
  instant: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
  pub fn new(instant: DateTime<Utc>) -> Self {
    Self { instant: Arc::new(Mutex::new(instant)) }
  }

  /// Jump to an absolute instant.
  pub fn set(&self, instant: DateTime<Utc>) {
    *self.instant.lock().unwrap_or_else(PoisonError::into_inner) = instant;
  }

  /// Move the clock forward (or backward, for a negative delta).
  pub fn advance(&self, by: TimeDelta) {
    let mut guard = self.instant.lock().unwrap_or_else(PoisonError::into_inner);
    *guard += by;
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    *self.instant.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn fixed_clock_clones_share_instant() {
    let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let clock = FixedClock::new(start);
    let handle = clock.clone();

    handle.advance(TimeDelta::seconds(20));
    assert_eq!(clock.now(), start + TimeDelta::seconds(20));

    clock.set(start);
    assert_eq!(handle.now(), start);
  }

  #[test]
  fn fixed_clock_does_not_drift() {
    let start = Utc.timestamp_opt(1_700_000_000, 500).unwrap();
    let clock = FixedClock::new(start);
    assert_eq!(clock.now(), clock.now());
  }
}
