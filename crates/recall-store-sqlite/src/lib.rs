//! SQLite backend for the Recall spaced-repetition engine.
//!
//! A store is a single SQLite file holding the problems, their current
//! schedules and an append-only review log. All access is synchronous and
//! assumes a single writer; every mutation runs inside one transaction.

mod encode;
mod populate;
mod scheduler;
mod schema;
mod stats;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use populate::Populator;
pub use schema::SCHEMA_VERSION;
pub use store::SqliteStore;
