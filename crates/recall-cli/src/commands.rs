//! Subcommand implementations.

use std::path::Path;

use anyhow::{Context as _, Result, bail};
use chrono::{TimeDelta, Utc};
use recall_core::{
  schedule::interval_secs,
  stats::{BucketKind, Counts},
  store::ReviewStore,
};
use recall_store_sqlite::{SCHEMA_VERSION, SqliteStore};

pub fn create(path: &Path, kind: &str) -> Result<()> {
  SqliteStore::create(path, kind)
    .with_context(|| format!("failed to create store at {}", path.display()))?
    .close()?;
  println!("Created {} ({kind})", path.display());
  Ok(())
}

pub fn info(path: &Path) -> Result<()> {
  let store = open(path)?;
  println!("kind:    {}", store.kind());
  println!("schema:  {SCHEMA_VERSION}");
  Ok(())
}

pub fn load(path: &Path, file: &Path, wipe: bool) -> Result<()> {
  let raw = std::fs::read_to_string(file)
    .with_context(|| format!("reading {}", file.display()))?;
  let pairs = parse_pairs(&raw)
    .with_context(|| format!("parsing {}", file.display()))?;

  let mut store = open(path)?;
  let added = store
    .populate(|p| {
      if wipe {
        p.wipe()?;
      }
      for (question, answer) in &pairs {
        p.add(question, answer)?;
      }
      Ok(p.added())
    })
    .context("load rolled back")?;

  println!("Loaded {added} problems");
  Ok(())
}

pub fn next(path: &Path, count: usize) -> Result<()> {
  let store = open(path)?;
  let problems = store.get_next(count)?;
  if problems.is_empty() {
    println!("No more problems to learn");
    return Ok(());
  }

  let now = Utc::now();
  for p in problems {
    let status = if p.new {
      "new".to_owned()
    } else {
      format!("overdue {}", human_interval(now - p.schedule.next_due))
    };
    println!(
      "{:>6}  {:<8}  {:<16}  {}",
      p.id.to_string(),
      human_interval(p.schedule.interval),
      status,
      p.question
    );
  }
  Ok(())
}

pub fn stats(path: &Path, json: bool) -> Result<()> {
  let store = open(path)?;
  let counts = store.get_counts()?;
  if json {
    println!("{}", serde_json::to_string_pretty(&counts)?);
  } else {
    print!("{}", render_counts(&counts));
  }
  Ok(())
}

fn open(path: &Path) -> Result<SqliteStore> {
  SqliteStore::open(path)
    .with_context(|| format!("failed to open store at {}", path.display()))
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Parse `question<TAB>answer` records. `#` comment lines and blank lines
/// are skipped; fields may be double-quoted to hold tabs or newlines.
fn parse_pairs(raw: &str) -> Result<Vec<(String, String)>> {
  let mut reader = csv::ReaderBuilder::new()
    .delimiter(b'\t')
    .has_headers(false)
    .comment(Some(b'#'))
    .flexible(false)
    .from_reader(raw.as_bytes());

  let mut pairs = Vec::new();
  for result in reader.records() {
    let record = result.map_err(|e| {
      let line = e.position().map_or(0, |p| p.line());
      anyhow::Error::new(e).context(format!("line {line}"))
    })?;
    let line = record.position().map_or(0, |p| p.line());

    if record.len() != 2 {
      bail!("line {line}: expected question<TAB>answer, found {} fields", record.len());
    }
    let (question, answer) = (&record[0], &record[1]);
    if question.is_empty() {
      bail!("line {line}: empty question");
    }
    pairs.push((question.to_owned(), answer.to_owned()));
  }
  Ok(pairs)
}

/// Short human form of an interval in the unit of its histogram bucket.
fn human_interval(d: TimeDelta) -> String {
  let secs = interval_secs(d);
  let (divisor, unit) = match BucketKind::classify(d) {
    BucketKind::Seconds => (1.0, "s"),
    BucketKind::Minutes => (BucketKind::Seconds.upper_bound_secs(), "m"),
    BucketKind::Hours => (BucketKind::Minutes.upper_bound_secs(), "h"),
    BucketKind::Days => (BucketKind::Hours.upper_bound_secs(), "d"),
    BucketKind::Months => (BucketKind::Days.upper_bound_secs(), "mo"),
  };
  format!("{:.1}{unit}", secs / divisor)
}

fn render_counts(counts: &Counts) -> String {
  let mut out = format!(
    "Active: {}, Later: {}, Unlearned: {}\n",
    counts.active, counts.later, counts.unlearned
  );
  for bucket in &counts.buckets {
    out.push_str(&format!("  {:<4} {}\n", bucket.label(), bucket.count));
  }
  out
}

#[cfg(test)]
mod tests {
  use recall_core::stats::Bucket;

  use super::*;

  #[test]
  fn parses_tab_separated_lines() {
    let raw = "# scales\nC major\tC D E F G A B\n\nA minor\tA B C D E F G\r\n";
    let pairs = parse_pairs(raw).unwrap();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0], ("C major".to_owned(), "C D E F G A B".to_owned()));
    assert_eq!(pairs[1].1, "A B C D E F G");
  }

  #[test]
  fn rejects_line_without_tab() {
    let err = parse_pairs("ok\tfine\nbroken line\n").unwrap_err();
    assert!(err.to_string().contains("line 2"), "{err}");
  }

  #[test]
  fn rejects_extra_fields() {
    let err = parse_pairs("a\tb\tc\n").unwrap_err();
    assert!(err.to_string().contains("line 1"), "{err}");
  }

  #[test]
  fn quoted_fields_may_hold_tabs() {
    let pairs = parse_pairs("\"tab\there\"\tanswer\n").unwrap();
    assert_eq!(pairs, [("tab\there".to_owned(), "answer".to_owned())]);
  }

  #[test]
  fn intervals_use_bucket_units() {
    assert_eq!(human_interval(TimeDelta::seconds(11)), "11.0s");
    assert_eq!(human_interval(TimeDelta::seconds(90)), "1.5m");
    assert_eq!(human_interval(TimeDelta::hours(3)), "3.0h");
    assert_eq!(human_interval(TimeDelta::days(2)), "2.0d");
    assert_eq!(human_interval(TimeDelta::days(45)), "1.5mo");
  }

  #[test]
  fn renders_every_bucket() {
    let counts = Counts {
      active:    1,
      later:     2,
      unlearned: 7,
      buckets:   vec![
        Bucket { kind: BucketKind::Seconds, count: 1 },
        Bucket { kind: BucketKind::Minutes, count: 2 },
      ],
    };
    let text = render_counts(&counts);
    assert!(text.starts_with("Active: 1, Later: 2, Unlearned: 7\n"));
    assert!(text.contains("  sec  1\n"));
    assert!(text.contains("  min  2\n"));
  }
}
