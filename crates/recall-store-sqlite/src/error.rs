//! Error type for `recall-store-sqlite`.

use std::path::PathBuf;

use recall_core::problem::ProblemId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] recall_core::Error),

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("store already exists at {0}")]
  AlreadyExists(PathBuf),

  #[error("no store at {0}")]
  NotFound(PathBuf),

  /// The file opened but holds no recognisable schema.
  #[error("no schema present")]
  MissingSchema,

  #[error("schema version mismatch: store is {found:?}, expecting {expected:?}")]
  VersionMismatch { found: String, expected: String },

  #[error("multiple rows in schema_version")]
  MultipleVersions,

  #[error("store has no kind configured")]
  MissingKind,

  #[error("duplicate question: {0:?}")]
  DuplicateQuestion(String),

  #[error("problem not found: {0}")]
  ProblemNotFound(ProblemId),

  /// `wipe` is only allowed before anything has been added in the same load.
  #[error("wipe must precede any additions in a load")]
  WipeAfterAdd,

  /// `commit` was called on a load in which an operation had already failed.
  #[error("load aborted after an earlier error")]
  Aborted,

  #[error("interval of {0} seconds is below the minimum")]
  IntervalBelowFloor(f64),

  #[error("stored timestamp {0} is out of range")]
  TimestampRange(f64),

  #[error("stored factor {0} is not a valid grade")]
  StoredFactor(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
