//! Problems: the question/answer items under review.
//!
//! The question and answer are opaque to the engine. How they are shown and
//! graded is up to the front-end, guided by the store's `kind` tag.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::{Factor, Schedule};

/// Identity of a problem within one store.
///
/// Ids are assigned in insertion order starting at 1; wiping the store
/// restarts the sequence.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProblemId(pub i64);

impl fmt::Display for ProblemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// A problem as handed out for review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
  pub id:       ProblemId,
  pub question: String,
  pub answer:   String,
  /// The stored schedule, or the synthetic initial one for a new problem.
  pub schedule: Schedule,
  /// `true` when this problem has never been graded.
  pub new:      bool,
}

/// One row of the append-only review log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
  pub stamp:      DateTime<Utc>,
  pub problem_id: ProblemId,
  pub factor:     Factor,
}
