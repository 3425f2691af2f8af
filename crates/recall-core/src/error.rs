//! Error types for `recall-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A grade outside the 1–4 scale.
  #[error("invalid factor {0}: expected a grade between 1 and 4")]
  InvalidFactor(u8),

  #[error("interval of {0} seconds cannot be represented")]
  IntervalRange(f64),

  #[error("timestamp overflow while scheduling")]
  TimestampOverflow,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
