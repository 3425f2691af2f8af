//! Progress statistics.
//!
//! [`Counts`] is a point-in-time snapshot: how many scheduled items are due,
//! how many are waiting, how many were never reviewed, and a histogram of the
//! scheduled items by interval magnitude.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::{Schedule, interval_secs};

// ─── Buckets ─────────────────────────────────────────────────────────────────

/// Interval magnitude class. Callers match on the variant; [`label`] is for
/// display only.
///
/// [`label`]: BucketKind::label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketKind {
  Seconds,
  Minutes,
  Hours,
  Days,
  Months,
}

/// Each unit's count before rolling into the next one.
const UNIT_LIMITS: [(BucketKind, f64); 5] = [
  (BucketKind::Seconds, 60.0),
  (BucketKind::Minutes, 60.0),
  (BucketKind::Hours, 24.0),
  (BucketKind::Days, 30.0),
  (BucketKind::Months, f64::INFINITY),
];

impl BucketKind {
  pub const ALL: [BucketKind; 5] = [
    BucketKind::Seconds,
    BucketKind::Minutes,
    BucketKind::Hours,
    BucketKind::Days,
    BucketKind::Months,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Self::Seconds => "sec",
      Self::Minutes => "min",
      Self::Hours => "hr",
      Self::Days => "day",
      Self::Months => "mon",
    }
  }

  /// Exclusive upper bound of this bucket in seconds: the running product of
  /// the unit limits up to and including this one.
  pub fn upper_bound_secs(self) -> f64 {
    let mut bound = 1.0;
    for (kind, limit) in UNIT_LIMITS {
      bound *= limit;
      if kind == self {
        break;
      }
    }
    bound
  }

  /// The bucket whose `[previous bound, bound)` range holds `interval`.
  pub fn classify(interval: TimeDelta) -> Self {
    let secs = interval_secs(interval);
    let mut bound = 1.0;
    for (kind, limit) in UNIT_LIMITS {
      bound *= limit;
      if secs < bound {
        return kind;
      }
    }
    Self::Months
  }
}

/// One histogram bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
  pub kind:  BucketKind,
  pub count: usize,
}

impl Bucket {
  pub fn label(&self) -> &'static str { self.kind.label() }
}

// ─── Counts ──────────────────────────────────────────────────────────────────

/// Snapshot of review progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
  /// Scheduled and due.
  pub active:    usize,
  /// Scheduled, not yet due.
  pub later:     usize,
  /// Never reviewed.
  pub unlearned: usize,
  /// One entry per [`BucketKind`], in order.
  pub buckets:   Vec<Bucket>,
}

impl Default for Counts {
  fn default() -> Self {
    Self {
      active:    0,
      later:     0,
      unlearned: 0,
      buckets:   BucketKind::ALL
        .into_iter()
        .map(|kind| Bucket { kind, count: 0 })
        .collect(),
    }
  }
}

impl Counts {
  /// Aggregate a snapshot from every problem's schedule; `None` marks a
  /// problem that has never been reviewed.
  pub fn tally<I>(now: DateTime<Utc>, schedules: I) -> Self
  where
    I: IntoIterator<Item = Option<Schedule>>,
  {
    let mut counts = Self::default();
    for schedule in schedules {
      let Some(schedule) = schedule else {
        counts.unlearned += 1;
        continue;
      };
      if schedule.is_due(now) {
        counts.active += 1;
      } else {
        counts.later += 1;
      }
      let kind = BucketKind::classify(schedule.interval);
      if let Some(bucket) = counts.buckets.iter_mut().find(|b| b.kind == kind) {
        bucket.count += 1;
      }
    }
    counts
  }

  /// Number of problems with a schedule.
  pub fn scheduled(&self) -> usize { self.active + self.later }

  pub fn bucket(&self, kind: BucketKind) -> usize {
    self
      .buckets
      .iter()
      .find(|b| b.kind == kind)
      .map_or(0, |b| b.count)
  }
}
