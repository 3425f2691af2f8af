//! `recall`: operator tool for Recall problem stores.
//!
//! # Usage
//!
//! ```text
//! recall --store drill.db create --kind simple
//! recall --store drill.db load problems.tsv --wipe
//! recall --store drill.db stats --json
//! ```
//!
//! The store path may also come from `recall.toml` (`store_path = "..."`) or
//! the `RECALL_STORE_PATH` environment variable.

mod commands;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "recall", version, about = "Spaced-repetition problem store tool")]
struct Cli {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "recall.toml")]
  config: PathBuf,

  /// Path to the store database; overrides the config file.
  #[arg(short, long, value_name = "PATH")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create a new, empty store.
  Create {
    /// Tag telling front-ends how to present the problems.
    #[arg(short, long)]
    kind: String,
  },

  /// Show the store's kind and schema version.
  Info,

  /// Load `question<TAB>answer` lines in a single transaction.
  Load {
    file: PathBuf,

    /// Remove every existing problem, schedule and log entry first.
    #[arg(long)]
    wipe: bool,
  },

  /// List the problems that would be asked next, without grading them.
  Next {
    #[arg(short = 'n', long, default_value_t = 2)]
    count: usize,
  },

  /// Print a progress snapshot.
  Stats {
    #[arg(long)]
    json: bool,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Settings merged from `recall.toml` and `RECALL_*` variables.
#[derive(Deserialize, Debug)]
struct Settings {
  store_path: PathBuf,
}

fn load_settings(cli: &Cli) -> Result<Settings> {
  let settings = config::Config::builder()
    .set_default("store_path", "recall.db")
    .context("setting config defaults")?
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("RECALL"))
    .build()
    .context("failed to read config file")?;

  let mut settings: Settings = settings
    .try_deserialize()
    .context("failed to deserialise settings")?;

  // CLI flag overrides config file and environment.
  if let Some(path) = &cli.store {
    settings.store_path = path.clone();
  }
  Ok(settings)
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = load_settings(&cli)?;
  let path = settings.store_path.as_path();

  match cli.command {
    Command::Create { kind } => commands::create(path, &kind),
    Command::Info => commands::info(path),
    Command::Load { file, wipe } => commands::load(path, &file, wipe),
    Command::Next { count } => commands::next(path, count),
    Command::Stats { json } => commands::stats(path, json),
  }
}
