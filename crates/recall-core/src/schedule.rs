//! The interval-update policy.
//!
//! A [`Schedule`] records when an item is next due and how long the current
//! review interval is. Grading an item with a [`Factor`] scales the previous
//! interval by the factor's multiplier and a jitter sample, clamped below at
//! [`MIN_INTERVAL_SECS`].

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Intervals never shrink below this many seconds.
pub const MIN_INTERVAL_SECS: f64 = 5.0;

/// Interval given to an item the first time it is presented.
pub const INITIAL_INTERVAL_SECS: f64 = 5.0;

// ─── Factor ──────────────────────────────────────────────────────────────────

/// How well an item was recalled, on a 1–4 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Factor {
  Wrong   = 1,
  Weak    = 2,
  Good    = 3,
  Correct = 4,
}

impl Factor {
  pub const ALL: [Factor; 4] =
    [Factor::Wrong, Factor::Weak, Factor::Good, Factor::Correct];

  /// Multiplier applied to the previous interval.
  pub fn multiplier(self) -> f64 {
    match self {
      Self::Wrong => 0.25,
      Self::Weak => 0.90,
      Self::Good => 1.20,
      Self::Correct => 2.20,
    }
  }

  pub fn as_u8(self) -> u8 { self as u8 }
}

impl TryFrom<u8> for Factor {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self> {
    match value {
      1 => Ok(Self::Wrong),
      2 => Ok(Self::Weak),
      3 => Ok(Self::Good),
      4 => Ok(Self::Correct),
      other => Err(Error::InvalidFactor(other)),
    }
  }
}

impl From<Factor> for u8 {
  fn from(f: Factor) -> Self { f.as_u8() }
}

// ─── Interval conversion ─────────────────────────────────────────────────────

/// Express an interval as fractional seconds.
pub fn interval_secs(d: TimeDelta) -> f64 {
  d.num_seconds() as f64 + f64::from(d.subsec_nanos()) / 1.0e9
}

/// Build an interval from fractional seconds, keeping nanosecond precision.
pub fn interval_from_secs(secs: f64) -> Result<TimeDelta> {
  if !secs.is_finite() {
    return Err(Error::IntervalRange(secs));
  }
  let whole = secs.trunc();
  if whole.abs() >= (i64::MAX / 1_000) as f64 {
    return Err(Error::IntervalRange(secs));
  }
  let nanos = ((secs - whole) * 1.0e9).round() as i64;
  TimeDelta::try_seconds(whole as i64)
    .and_then(|s| s.checked_add(&TimeDelta::nanoseconds(nanos)))
    .ok_or(Error::IntervalRange(secs))
}

// ─── Schedule ────────────────────────────────────────────────────────────────

/// When an item is next due, and the interval that produced that time.
///
/// `next_due` is always the grading instant plus `interval`; it is recomputed
/// on every update rather than stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
  pub next_due: DateTime<Utc>,
  #[serde(with = "interval_serde")]
  pub interval: TimeDelta,
}

impl Schedule {
  /// The schedule handed out with a never-reviewed item: due now, with the
  /// initial interval.
  pub fn initial(now: DateTime<Utc>) -> Self {
    Self {
      next_due: now,
      interval: TimeDelta::seconds(INITIAL_INTERVAL_SECS as i64),
    }
  }

  /// Compute the schedule that follows a grade.
  ///
  /// `jitter` is the multiplier drawn for this review; pass `1.0` for a
  /// deterministic result.
  pub fn graded(
    previous: TimeDelta,
    factor:   Factor,
    jitter:   f64,
    now:      DateTime<Utc>,
  ) -> Result<Self> {
    let secs = (interval_secs(previous) * factor.multiplier() * jitter)
      .max(MIN_INTERVAL_SECS);
    let interval = interval_from_secs(secs)?;
    let next_due = now
      .checked_add_signed(interval)
      .ok_or(Error::TimestampOverflow)?;
    Ok(Self { next_due, interval })
  }

  pub fn is_due(&self, now: DateTime<Utc>) -> bool { self.next_due <= now }
}

/// Intervals travel as fractional seconds.
mod interval_serde {
  use chrono::TimeDelta;
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn serialize<S: Serializer>(d: &TimeDelta, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(super::interval_secs(*d))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<TimeDelta, D::Error> {
    let secs = f64::deserialize(d)?;
    super::interval_from_secs(secs).map_err(D::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::jitter::{JITTER_MAX, JITTER_MIN};

  fn t0() -> DateTime<Utc> { Utc.timestamp_opt(1_700_000_000, 0).unwrap() }

  #[test]
  fn factor_from_u8() {
    assert_eq!(Factor::try_from(1).unwrap(), Factor::Wrong);
    assert_eq!(Factor::try_from(4).unwrap(), Factor::Correct);
    assert!(matches!(Factor::try_from(0), Err(Error::InvalidFactor(0))));
    assert!(matches!(Factor::try_from(5), Err(Error::InvalidFactor(5))));
  }

  #[test]
  fn factor_serialises_as_number() {
    assert_eq!(serde_json::to_string(&Factor::Good).unwrap(), "3");
    let f: Factor = serde_json::from_str("2").unwrap();
    assert_eq!(f, Factor::Weak);
    assert!(serde_json::from_str::<Factor>("9").is_err());
  }

  #[test]
  fn correct_grows_initial_interval() {
    let s = Schedule::graded(TimeDelta::seconds(5), Factor::Correct, 1.0, t0())
      .unwrap();
    assert_eq!(s.interval, TimeDelta::seconds(11));
    assert_eq!(s.next_due, t0() + TimeDelta::seconds(11));
  }

  #[test]
  fn wrong_is_clamped_to_floor() {
    let s = Schedule::graded(TimeDelta::seconds(8), Factor::Wrong, 1.25, t0())
      .unwrap();
    assert_eq!(s.interval, TimeDelta::seconds(5));
    assert_eq!(s.next_due, t0() + TimeDelta::seconds(5));
  }

  #[test]
  fn interval_bounds_hold_for_every_factor() {
    let previous = [1.0, 5.0, 7.5, 60.0, 3_600.0, 86_400.0 * 40.0];
    for prev in previous {
      let prev_d = interval_from_secs(prev).unwrap();
      for factor in Factor::ALL {
        let m = factor.multiplier();
        let lo = (prev * m * JITTER_MIN).max(MIN_INTERVAL_SECS);
        let hi = (prev * m * JITTER_MAX).max(MIN_INTERVAL_SECS);
        for jitter in [JITTER_MIN, 1.0, JITTER_MAX] {
          let s = Schedule::graded(prev_d, factor, jitter, t0()).unwrap();
          let got = interval_secs(s.interval);
          assert!(
            got >= lo - 1e-6 && got <= hi + 1e-6,
            "{factor:?} from {prev}s gave {got}s, expected [{lo}, {hi}]"
          );
          assert!(got >= MIN_INTERVAL_SECS);
          assert_eq!(s.next_due, t0() + s.interval);
        }
      }
    }
  }

  #[test]
  fn fractional_seconds_survive_conversion() {
    let d = interval_from_secs(12.345_678_9).unwrap();
    assert_eq!(d.num_seconds(), 12);
    assert_eq!(d.subsec_nanos(), 345_678_900);
    assert!((interval_secs(d) - 12.345_678_9).abs() < 1e-9);
  }

  #[test]
  fn non_finite_interval_is_rejected() {
    assert!(interval_from_secs(f64::NAN).is_err());
    assert!(interval_from_secs(f64::INFINITY).is_err());
    assert!(interval_from_secs(1.0e300).is_err());
  }

  #[test]
  fn initial_schedule_is_due_immediately() {
    let s = Schedule::initial(t0());
    assert!(s.is_due(t0()));
    assert_eq!(s.interval, TimeDelta::seconds(5));
  }
}
