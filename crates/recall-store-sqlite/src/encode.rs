//! Encoding and decoding helpers between Rust domain types and the column
//! representations stored in SQLite.
//!
//! Timestamps are stored as REAL seconds since the Unix epoch, intervals as
//! REAL seconds. Both keep the fractional part, so sub-second clock steps
//! survive a round trip.

use chrono::{DateTime, TimeDelta, Utc};
use recall_core::{
  problem::{LogEntry, Problem, ProblemId},
  schedule::{Factor, Schedule, interval_from_secs, interval_secs},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> f64 {
  dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1.0e9
}

pub fn decode_dt(t: f64) -> Result<DateTime<Utc>> {
  if !t.is_finite() {
    return Err(Error::TimestampRange(t));
  }
  let mut secs = t.floor();
  let mut nanos = ((t - secs) * 1.0e9).round();
  if nanos >= 1.0e9 {
    secs += 1.0;
    nanos = 0.0;
  }
  if secs.abs() >= i64::MAX as f64 {
    return Err(Error::TimestampRange(t));
  }
  DateTime::<Utc>::from_timestamp(secs as i64, nanos as u32).ok_or(Error::TimestampRange(t))
}

// ─── Interval ────────────────────────────────────────────────────────────────

pub fn encode_interval(d: TimeDelta) -> f64 { interval_secs(d) }

pub fn decode_interval(secs: f64) -> Result<TimeDelta> { Ok(interval_from_secs(secs)?) }

// ─── Factor ──────────────────────────────────────────────────────────────────

pub fn encode_factor(f: Factor) -> i64 { i64::from(f.as_u8()) }

pub fn decode_factor(n: i64) -> Result<Factor> {
  u8::try_from(n)
    .ok()
    .and_then(|n| Factor::try_from(n).ok())
    .ok_or(Error::StoredFactor(n))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read from `items` left-joined with `schedule`.
pub struct RawProblem {
  pub id:       i64,
  pub question: String,
  pub answer:   String,
  pub next_due: Option<f64>,
  pub interval: Option<f64>,
}

impl RawProblem {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:       row.get(0)?,
      question: row.get(1)?,
      answer:   row.get(2)?,
      next_due: row.get(3)?,
      interval: row.get(4)?,
    })
  }

  /// Decode into a [`Problem`]. A row without a schedule becomes a new
  /// problem carrying [`Schedule::initial`] at `now`.
  pub fn into_problem(self, now: DateTime<Utc>) -> Result<Problem> {
    let (schedule, new) = match (self.next_due, self.interval) {
      (Some(next_due), Some(interval)) => (
        Schedule {
          next_due: decode_dt(next_due)?,
          interval: decode_interval(interval)?,
        },
        false,
      ),
      _ => (Schedule::initial(now), true),
    };

    Ok(Problem {
      id: ProblemId(self.id),
      question: self.question,
      answer: self.answer,
      schedule,
      new,
    })
  }
}

/// Raw values read from a `log` row.
pub struct RawLogEntry {
  pub stamp:   f64,
  pub item_id: i64,
  pub factor:  i64,
}

impl RawLogEntry {
  pub fn into_entry(self) -> Result<LogEntry> {
    Ok(LogEntry {
      stamp:      decode_dt(self.stamp)?,
      problem_id: ProblemId(self.item_id),
      factor:     decode_factor(self.factor)?,
    })
  }
}

/// Raw values read from a `schedule` row; `None` for unscheduled items.
pub struct RawSchedule {
  pub next_due: Option<f64>,
  pub interval: Option<f64>,
}

impl RawSchedule {
  pub fn into_schedule(self) -> Result<Option<Schedule>> {
    match (self.next_due, self.interval) {
      (Some(next_due), Some(interval)) => Ok(Some(Schedule {
        next_due: decode_dt(next_due)?,
        interval: decode_interval(interval)?,
      })),
      _ => Ok(None),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamp_roundtrip_keeps_subsecond_precision() {
    let samples = [
      Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
      Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap(),
      Utc.timestamp_opt(1_700_000_020, 999_999_000).unwrap(),
      Utc.timestamp_opt(1, 500_000_000).unwrap(),
    ];
    for dt in samples {
      let back = decode_dt(encode_dt(dt)).unwrap();
      let err = (back - dt).num_nanoseconds().unwrap().abs();
      assert!(err < 1_000, "{dt} came back as {back} ({err}ns off)");
    }
  }

  #[test]
  fn encoding_preserves_order() {
    let a = Utc.timestamp_opt(1_700_000_000, 100_000).unwrap();
    let b = a + TimeDelta::milliseconds(1);
    assert!(encode_dt(a) < encode_dt(b));
  }

  #[test]
  fn interval_roundtrip() {
    let d = TimeDelta::seconds(11) + TimeDelta::microseconds(250);
    let back = decode_interval(encode_interval(d)).unwrap();
    assert_eq!(back, d);
  }

  #[test]
  fn bad_values_are_rejected() {
    assert!(decode_dt(f64::NAN).is_err());
    assert!(decode_factor(0).is_err());
    assert!(decode_factor(300).is_err());
    assert_eq!(decode_factor(3).unwrap(), Factor::Good);
  }
}
