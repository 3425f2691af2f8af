//! [`SqliteStore`]: the SQLite implementation of [`ReviewStore`].

use std::{path::Path, sync::Arc};

use recall_core::{
  clock::{Clock, SystemClock},
  jitter::{Jitter, UniformJitter},
  problem::{LogEntry, Problem},
  schedule::{Factor, Schedule, interval_secs},
  stats::Counts,
  store::ReviewStore,
};
use rusqlite::{Connection, OpenFlags, OptionalExtension as _};
use tracing::{debug, info, warn};

use crate::{
  encode::RawLogEntry,
  populate::Populator,
  scheduler, stats,
  schema::{PRAGMAS, SCHEMA, SCHEMA_VERSION},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A problem store backed by a single SQLite file.
///
/// Time comes from an injectable [`Clock`] and interval noise from an
/// injectable [`Jitter`]; both default to the real thing.
pub struct SqliteStore {
  conn:   Connection,
  kind:   String,
  clock:  Arc<dyn Clock>,
  jitter: Box<dyn Jitter>,
}

impl SqliteStore {
  /// Create a fresh store at `path`. Fails if anything already exists there.
  pub fn create(path: impl AsRef<Path>, kind: &str) -> Result<Self> {
    let path = path.as_ref();
    if path.exists() {
      return Err(Error::AlreadyExists(path.to_path_buf()));
    }

    let conn = Connection::open_with_flags(
      path,
      OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    let store = Self::initialise(conn, kind)?;
    info!(path = %path.display(), kind = %kind, "created store");
    Ok(store)
  }

  /// Create a store that lives only as long as the value. Used in
  /// tests.
  pub fn create_in_memory(kind: &str) -> Result<Self> {
    Self::initialise(Connection::open_in_memory()?, kind)
  }

  /// Open an existing store, checking its schema version.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      return Err(Error::NotFound(path.to_path_buf()));
    }

    let conn = Connection::open_with_flags(
      path,
      OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    check_version(&conn)?;
    let kind = read_kind(&conn)?;
    conn.execute_batch(PRAGMAS)?;

    info!(path = %path.display(), kind = %kind, "opened store");
    Ok(Self::from_parts(conn, kind))
  }

  fn initialise(mut conn: Connection, kind: &str) -> Result<Self> {
    conn.execute_batch(PRAGMAS)?;

    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA)?;
    tx.execute(
      "INSERT INTO config (key, value) VALUES ('kind', ?1)",
      rusqlite::params![kind],
    )?;
    tx.execute(
      "INSERT INTO schema_version (version) VALUES (?1)",
      rusqlite::params![SCHEMA_VERSION],
    )?;
    tx.commit()?;

    Ok(Self::from_parts(conn, kind.to_owned()))
  }

  fn from_parts(conn: Connection, kind: String) -> Self {
    Self {
      conn,
      kind,
      clock: Arc::new(SystemClock),
      jitter: Box::new(UniformJitter::from_entropy()),
    }
  }

  /// Replace the time source.
  pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
    self.clock = Arc::new(clock);
    self
  }

  /// Replace the interval noise source.
  pub fn with_jitter(mut self, jitter: impl Jitter + 'static) -> Self {
    self.jitter = Box::new(jitter);
    self
  }

  /// Close the underlying connection, reporting any error from SQLite.
  pub fn close(self) -> Result<()> {
    self.conn.close().map_err(|(_, e)| Error::Database(e))
  }

  // ── Population ────────────────────────────────────────────────────────────

  /// Start a bulk load. Everything done through the returned [`Populator`]
  /// is discarded unless [`Populator::commit`] is called.
  pub fn begin(&mut self) -> Result<Populator<'_>> {
    Populator::begin(self.conn.transaction()?)
  }

  /// Run `load` inside a single population transaction, committing if it
  /// returns `Ok` and rolling back otherwise.
  pub fn populate<T, F>(&mut self, load: F) -> Result<T>
  where
    F: FnOnce(&mut Populator<'_>) -> Result<T>,
  {
    let mut populator = self.begin()?;
    match load(&mut populator) {
      Ok(value) => {
        populator.commit()?;
        Ok(value)
      }
      Err(e) => {
        if let Err(rollback) = populator.rollback() {
          warn!(error = %rollback, load_error = %e, "rollback after failed load failed");
        }
        Err(e)
      }
    }
  }

  // ── Audit log ─────────────────────────────────────────────────────────────

  /// Every recorded grade, oldest first.
  pub fn log_entries(&self) -> Result<Vec<LogEntry>> {
    let mut stmt = self
      .conn
      .prepare("SELECT stamp, item_id, factor FROM log ORDER BY rowid")?;
    let raws = stmt
      .query_map([], |row| {
        Ok(RawLogEntry {
          stamp:   row.get(0)?,
          item_id: row.get(1)?,
          factor:  row.get(2)?,
        })
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(RawLogEntry::into_entry).collect()
  }
}

// ─── Header checks ───────────────────────────────────────────────────────────

fn check_version(conn: &Connection) -> Result<()> {
  let has_table: bool = conn
    .query_row(
      "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
      [],
      |_| Ok(true),
    )
    .optional()?
    .unwrap_or(false);
  if !has_table {
    return Err(Error::MissingSchema);
  }

  let mut stmt = conn.prepare("SELECT version FROM schema_version")?;
  let versions = stmt
    .query_map([], |row| row.get::<_, String>(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  match versions.as_slice() {
    [] => Err(Error::MissingSchema),
    [found] if found == SCHEMA_VERSION => Ok(()),
    [found] => {
      warn!(found = %found, expected = SCHEMA_VERSION, "schema version mismatch");
      Err(Error::VersionMismatch {
        found:    found.clone(),
        expected: SCHEMA_VERSION.to_owned(),
      })
    }
    _ => Err(Error::MultipleVersions),
  }
}

fn read_kind(conn: &Connection) -> Result<String> {
  conn
    .query_row("SELECT value FROM config WHERE key = 'kind'", [], |row| row.get(0))
    .optional()?
    .ok_or(Error::MissingKind)
}

// ─── ReviewStore impl ────────────────────────────────────────────────────────

impl ReviewStore for SqliteStore {
  type Error = Error;

  fn kind(&self) -> &str { &self.kind }

  fn get_next(&self, count: usize) -> Result<Vec<Problem>> {
    if count == 0 {
      return Ok(Vec::new());
    }

    let now = self.clock.now();
    let due = scheduler::select_due(&self.conn, now, count)?;
    if !due.is_empty() {
      debug!(due = due.len(), "selected due problems");
      return Ok(due);
    }

    // Nothing is due: offer one new problem. More than one would be stale by
    // the time the first is answered.
    Ok(scheduler::first_unlearned(&self.conn, now)?.into_iter().collect())
  }

  fn get_new(&self) -> Result<Option<Problem>> {
    scheduler::first_unlearned(&self.conn, self.clock.now())
  }

  fn update(&mut self, problem: &Problem, factor: Factor) -> Result<()> {
    let now = self.clock.now();
    let jitter = self.jitter.sample();
    let schedule = Schedule::graded(problem.schedule.interval, factor, jitter, now)?;

    let tx = self.conn.transaction()?;
    scheduler::record_grade(&tx, problem.id, &schedule, factor, now)?;
    tx.commit()?;

    debug!(
      problem = %problem.id,
      factor = factor.as_u8(),
      interval_secs = interval_secs(schedule.interval),
      "rescheduled problem"
    );
    Ok(())
  }

  fn get_counts(&self) -> Result<Counts> { stats::snapshot(&self.conn, self.clock.now()) }
}
