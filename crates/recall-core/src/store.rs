//! The `ReviewStore` trait.
//!
//! Implemented by storage backends (e.g. `recall-store-sqlite`). Front-ends
//! that drill a user depend on this abstraction rather than a concrete
//! backend. Bulk loading is backend-specific and not part of the trait.

use crate::{
  problem::Problem,
  schedule::Factor,
  stats::Counts,
};

/// Scheduling queries and grading over a store of problems.
pub trait ReviewStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Tag describing how problems are to be presented.
  fn kind(&self) -> &str;

  /// Up to `count` due problems, earliest-due first (ties by id).
  ///
  /// When nothing is due, returns a single never-reviewed problem if one
  /// exists, and an empty list otherwise.
  fn get_next(&self, count: usize) -> Result<Vec<Problem>, Self::Error>;

  /// The never-reviewed problem with the lowest id, carrying the initial
  /// schedule. `None` once every problem has been reviewed.
  fn get_new(&self) -> Result<Option<Problem>, Self::Error>;

  /// Record a grade: reschedule `problem` and append to the review log,
  /// atomically.
  fn update(&mut self, problem: &Problem, factor: Factor) -> Result<(), Self::Error>;

  /// Progress snapshot as of now.
  fn get_counts(&self) -> Result<Counts, Self::Error>;
}
