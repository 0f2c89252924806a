//! End-of-run summary
//!
//! Collects the crawl report counters and the aggregation result into one
//! value that the binary prints and tests can inspect.

use crate::output::AggregateSummary;
use crate::state::{CrawlReport, FailureKind, TaskFailure};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Summary of one harvest run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// URLs claimed (seeds plus discovered links)
    pub urls_claimed: usize,

    pub pages_written: u64,
    pub pages_already_present: u64,
    /// Pages crawled for their links only, having no title
    pub pages_untitled: u64,
    pub records_written: u64,

    pub failures: Vec<TaskFailure>,
    pub failures_by_kind: HashMap<FailureKind, u64>,

    /// Combined dataset, absent when only the crawl phase ran
    pub combined: Option<AggregateSummary>,
}

impl CrawlSummary {
    /// Builds a summary from a finished crawl's report
    pub fn from_report(
        report: &CrawlReport,
        urls_claimed: usize,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            urls_claimed,
            pages_written: report.pages_written(),
            pages_already_present: report.pages_already_present(),
            pages_untitled: report.pages_untitled(),
            records_written: report.records_written(),
            failures: report.failures(),
            failures_by_kind: report.failures_by_kind(),
            combined: None,
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Pages that ended without an error
    pub fn pages_succeeded(&self) -> u64 {
        self.pages_written + self.pages_already_present + self.pages_untitled
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Run:");
    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Finished: {}", summary.finished_at.to_rfc3339());
    println!("  Duration: {} seconds", summary.duration_seconds());
    println!();

    println!("Pages:");
    println!("  URLs claimed: {}", summary.urls_claimed);
    println!("  Pages written: {}", summary.pages_written);
    println!("  Pages already on disk: {}", summary.pages_already_present);
    println!("  Pages without title: {}", summary.pages_untitled);
    println!("  Records written: {}", summary.records_written);
    println!();

    if !summary.failures_by_kind.is_empty() {
        println!("Failures ({}):", summary.failure_count());
        let mut counts: Vec<_> = summary.failures_by_kind.iter().collect();
        counts.sort();
        for (kind, count) in counts {
            println!("  {}: {}", kind, count);
        }
        println!();
    }

    if let Some(combined) = &summary.combined {
        println!(
            "Dataset: {} ({} records from {} files)",
            combined.path.display(),
            combined.records,
            combined.files
        );
    }
}
