//! Progress snapshot query.

use chrono::{DateTime, Utc};
use recall_core::stats::Counts;
use rusqlite::Connection;

use crate::{
  encode::{RawSchedule, decode_dt, encode_dt},
  Result,
};

/// Read every problem's schedule in one statement and tally it.
///
/// A single `SELECT` sees one consistent snapshot of the database.
pub fn snapshot(conn: &Connection, now: DateTime<Utc>) -> Result<Counts> {
  // Compare on the same grid as the stored REAL timestamps, so "due" agrees
  // with `select_due`.
  let now = decode_dt(encode_dt(now))?;

  let mut stmt = conn.prepare_cached(
    "SELECT s.next_due, s.interval
     FROM items i
     LEFT JOIN schedule s ON s.item_id = i.id",
  )?;
  let raws = stmt
    .query_map([], |row| {
      Ok(RawSchedule {
        next_due: row.get(0)?,
        interval: row.get(1)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let schedules = raws
    .into_iter()
    .map(RawSchedule::into_schedule)
    .collect::<Result<Vec<_>>>()?;

  Ok(Counts::tally(now, schedules))
}
