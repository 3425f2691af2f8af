//! [`Populator`]: transactional bulk loading of problems.

use recall_core::{
  problem::ProblemId,
  schedule::{MIN_INTERVAL_SECS, Schedule, interval_secs},
};
use rusqlite::Transaction;
use tracing::{info, warn};

use crate::{
  encode::{encode_dt, encode_interval},
  Error, Result,
};

/// A write transaction for loading problems.
///
/// Ids are assigned here, counting up from the current maximum (or from 1
/// after [`wipe`](Self::wipe)), so regenerating a problem set yields the same
/// ids. Dropping a `Populator` without calling [`commit`](Self::commit) rolls
/// everything back, and so does `commit` once any operation has failed.
pub struct Populator<'conn> {
  tx:      Transaction<'conn>,
  next_id: i64,
  added:   usize,
  failed:  bool,
}

impl<'conn> Populator<'conn> {
  pub(crate) fn begin(tx: Transaction<'conn>) -> Result<Self> {
    let max_id: i64 =
      tx.query_row("SELECT COALESCE(MAX(id), 0) FROM items", [], |row| row.get(0))?;
    Ok(Self { tx, next_id: max_id + 1, added: 0, failed: false })
  }

  /// Delete every problem together with its schedule and log history, and
  /// restart id assignment at 1. Must come before any `add`.
  pub fn wipe(&mut self) -> Result<()> {
    let result = self.delete_all();
    self.latch(result)
  }

  fn delete_all(&mut self) -> Result<()> {
    if self.added > 0 {
      return Err(Error::WipeAfterAdd);
    }
    self
      .tx
      .execute_batch("DELETE FROM log; DELETE FROM schedule; DELETE FROM items;")?;
    self.next_id = 1;
    Ok(())
  }

  /// Add a never-reviewed problem. Fails if `question` is already present.
  pub fn add(&mut self, question: &str, answer: &str) -> Result<ProblemId> {
    let result = self.insert_item(question, answer);
    self.latch(result)
  }

  fn insert_item(&mut self, question: &str, answer: &str) -> Result<ProblemId> {
    let id = ProblemId(self.next_id);
    self
      .tx
      .execute(
        "INSERT INTO items (id, question, answer) VALUES (?1, ?2, ?3)",
        rusqlite::params![id.0, question, answer],
      )
      .map_err(|e| {
        if is_unique_violation(&e) {
          Error::DuplicateQuestion(question.to_owned())
        } else {
          Error::Database(e)
        }
      })?;

    self.next_id += 1;
    self.added += 1;
    Ok(id)
  }

  /// Add a problem that is already part-way through learning, e.g. when
  /// importing from another system.
  pub fn add_learning(
    &mut self,
    question: &str,
    answer:   &str,
    schedule: Schedule,
  ) -> Result<ProblemId> {
    let result = self.insert_learning(question, answer, schedule);
    self.latch(result)
  }

  fn insert_learning(
    &mut self,
    question: &str,
    answer:   &str,
    schedule: Schedule,
  ) -> Result<ProblemId> {
    let secs = interval_secs(schedule.interval);
    if secs < MIN_INTERVAL_SECS {
      return Err(Error::IntervalBelowFloor(secs));
    }

    let id = self.insert_item(question, answer)?;
    self.tx.execute(
      "INSERT INTO schedule (item_id, next_due, interval) VALUES (?1, ?2, ?3)",
      rusqlite::params![
        id.0,
        encode_dt(schedule.next_due),
        encode_interval(schedule.interval),
      ],
    )?;
    Ok(id)
  }

  /// Problems added so far in this load.
  pub fn added(&self) -> usize { self.added }

  /// Whether an earlier operation in this load has failed.
  pub fn failed(&self) -> bool { self.failed }

  /// Make the load visible. Returns the number of problems added.
  ///
  /// If any operation failed, the load is rolled back instead and
  /// [`Error::Aborted`] is returned.
  pub fn commit(self) -> Result<usize> {
    if self.failed {
      self.tx.rollback()?;
      warn!("problem load had errors, rolled back");
      return Err(Error::Aborted);
    }
    let added = self.added;
    self.tx.commit()?;
    info!(added, "committed problem load");
    Ok(added)
  }

  fn latch<T>(&mut self, result: Result<T>) -> Result<T> {
    if result.is_err() {
      self.failed = true;
    }
    result
  }

  /// Discard the load.
  pub fn rollback(self) -> Result<()> {
    self.tx.rollback()?;
    Ok(())
  }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _)
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}
