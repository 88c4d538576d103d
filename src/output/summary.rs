//! Run summary
//!
//! Counts attempted, resolved and failed entries, and keeps enough context about every
//! failure (entry id, failing step) to diagnose upstream format drift.

use crate::model::CatalogEntry;
use crate::resolver::{ResolveError, Step};
use chrono::{DateTime, Utc};

/// One dropped entry
#[derive(Debug, Clone)]
pub struct EntryFailure {
    pub entry_id: String,
    pub title: Option<String>,
    pub step: Step,
    pub message: String,
}

/// Outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Name of the catalog source
    pub source_name: String,

    /// Entries handed to the resolver
    pub attempted: u64,

    /// Entries that produced at least one stream
    pub resolved: u64,

    /// Entries dropped by a failing step
    pub failed: u64,

    /// Playlist records produced (an entry may yield several)
    pub streams: u64,

    /// Catalog pages fetched
    pub pages: u32,

    /// True if the run stopped on a cancellation signal
    pub cancelled: bool,

    pub failures: Vec<EntryFailure>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    /// Creates an empty summary stamped with the current time
    pub fn start(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            attempted: 0,
            resolved: 0,
            failed: 0,
            streams: 0,
            pages: 0,
            cancelled: false,
            failures: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_success(&mut self, streams: usize) {
        self.attempted += 1;
        self.resolved += 1;
        self.streams += streams as u64;
    }

    pub fn record_failure(&mut self, entry: &CatalogEntry, error: &ResolveError) {
        self.attempted += 1;
        self.failed += 1;
        self.failures.push(EntryFailure {
            entry_id: entry.id.clone(),
            title: entry.title.clone(),
            step: error.step(),
            message: error.to_string(),
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// True when the catalog yielded no entries at all
    pub fn is_empty_catalog(&self) -> bool {
        self.attempted == 0 && !self.cancelled
    }

    /// Percentage of attempted entries that resolved
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            (self.resolved as f64 / self.attempted as f64) * 100.0
        }
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Failure counts per step, most frequent first
    pub fn failures_by_step(&self) -> Vec<(Step, u64)> {
        let mut counts: Vec<(Step, u64)> = Vec::new();
        for failure in &self.failures {
            match counts.iter_mut().find(|(step, _)| *step == failure.step) {
                Some((_, count)) => *count += 1,
                None => counts.push((failure.step, 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary: {} ===\n", summary.source_name);

    println!("Overview:");
    println!("  Pages fetched: {}", summary.pages);
    println!("  Entries attempted: {}", summary.attempted);
    println!("  Entries resolved: {}", summary.resolved);
    println!("  Entries failed: {}", summary.failed);
    println!("  Playlist records: {}", summary.streams);
    if let Some(duration) = summary.duration_seconds() {
        println!("  Duration: {}s", duration);
    }
    println!();

    let by_step = summary.failures_by_step();
    if !by_step.is_empty() {
        println!("Failures by Step:");
        for (step, count) in by_step {
            println!("  {}: {}", step, count);
        }
        println!();
    }

    if summary.cancelled {
        println!("Run was cancelled; the playlist holds the entries resolved so far.");
    } else if summary.is_empty_catalog() {
        println!("Catalog was empty; an empty playlist was written.");
    }

    println!(
        "Success Rate: {:.1}% ({} / {} entries resolved)",
        summary.success_rate(),
        summary.resolved,
        summary.attempted
    );
}
