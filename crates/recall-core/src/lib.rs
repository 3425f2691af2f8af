//! Core types and trait definitions for the Recall spaced-repetition engine.
//!
//! This crate is deliberately free of database dependencies. It owns the
//! scheduling policy (how intervals grow after a grade), the statistics
//! model, and the time and randomness seams that tests substitute.

pub mod clock;
pub mod error;
pub mod jitter;
pub mod problem;
pub mod schedule;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
