//! Due-item selection and grade persistence.
//!
//! These helpers take a plain [`Connection`] so they run equally against the
//! store's connection or an open transaction.

use chrono::{DateTime, Utc};
use recall_core::{
  problem::{Problem, ProblemId},
  schedule::{Factor, Schedule},
};
use rusqlite::{Connection, OptionalExtension as _};

use crate::{
  encode::{RawProblem, encode_dt, encode_factor, encode_interval},
  Error, Result,
};

/// Up to `count` scheduled problems with `next_due <= now`, earliest first,
/// ties broken by id.
pub fn select_due(
  conn:  &Connection,
  now:   DateTime<Utc>,
  count: usize,
) -> Result<Vec<Problem>> {
  let limit = i64::try_from(count).unwrap_or(i64::MAX);

  let mut stmt = conn.prepare_cached(
    "SELECT i.id, i.question, i.answer, s.next_due, s.interval
     FROM items i
     JOIN schedule s ON s.item_id = i.id
     WHERE s.next_due <= ?1
     ORDER BY s.next_due, i.id
     LIMIT ?2",
  )?;
  let raws = stmt
    .query_map(rusqlite::params![encode_dt(now), limit], RawProblem::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(|raw| raw.into_problem(now)).collect()
}

/// The unscheduled problem with the lowest id, if any.
pub fn first_unlearned(conn: &Connection, now: DateTime<Utc>) -> Result<Option<Problem>> {
  let raw = conn
    .query_row(
      "SELECT i.id, i.question, i.answer, NULL, NULL
       FROM items i
       WHERE NOT EXISTS (SELECT 1 FROM schedule s WHERE s.item_id = i.id)
       ORDER BY i.id
       LIMIT 1",
      [],
      RawProblem::from_row,
    )
    .optional()?;

  raw.map(|raw| raw.into_problem(now)).transpose()
}

/// Replace the schedule of `id` and append a log entry. Callers run this
/// inside a transaction so both rows land together.
pub fn record_grade(
  conn:     &Connection,
  id:       ProblemId,
  schedule: &Schedule,
  factor:   Factor,
  now:      DateTime<Utc>,
) -> Result<()> {
  let exists = conn
    .query_row(
      "SELECT 1 FROM items WHERE id = ?1",
      rusqlite::params![id.0],
      |_| Ok(()),
    )
    .optional()?
    .is_some();
  if !exists {
    return Err(Error::ProblemNotFound(id));
  }

  conn.execute(
    "INSERT INTO schedule (item_id, next_due, interval) VALUES (?1, ?2, ?3)
     ON CONFLICT (item_id) DO UPDATE
       SET next_due = excluded.next_due,
           interval = excluded.interval",
    rusqlite::params![
      id.0,
      encode_dt(schedule.next_due),
      encode_interval(schedule.interval),
    ],
  )?;
  conn.execute(
    "INSERT INTO log (stamp, item_id, factor) VALUES (?1, ?2, ?3)",
    rusqlite::params![encode_dt(now), id.0, encode_factor(factor)],
  )?;
  Ok(())
}
