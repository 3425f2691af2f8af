//! SQL schema for the Recall SQLite store.
//!
//! Executed once, inside the creating transaction. There are no migrations:
//! `schema_version` is compared by exact string equality on every open.

/// Version stamp written at creation and required on open.
pub const SCHEMA_VERSION: &str = "recall-20261016A";

/// Connection-level settings applied on every create and open.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// Full schema DDL.
pub const SCHEMA: &str = "
CREATE TABLE items (
    id        INTEGER PRIMARY KEY,
    question  TEXT NOT NULL UNIQUE,
    answer    TEXT NOT NULL
);

-- At most one row per item; replaced on every grade.
CREATE TABLE schedule (
    item_id   INTEGER PRIMARY KEY REFERENCES items(id),
    next_due  REAL NOT NULL,      -- seconds since the Unix epoch
    interval  REAL NOT NULL       -- seconds
);

-- Append-only. No UPDATE or DELETE outside a full wipe.
CREATE TABLE log (
    stamp     REAL NOT NULL,
    item_id   INTEGER NOT NULL REFERENCES items(id),
    factor    INTEGER NOT NULL
);

CREATE TABLE config (
    key       TEXT PRIMARY KEY,
    value     TEXT NOT NULL
);

CREATE TABLE schema_version (
    version   TEXT NOT NULL
);

CREATE INDEX schedule_next_idx ON schedule(next_due);
";
