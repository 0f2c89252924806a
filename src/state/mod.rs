//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageOutcome`: how a successfully crawled page was persisted
//! - `FailureKind`: category of a failed crawl task
//! - `CrawlReport`: run-level counters and failure log shared by all tasks

mod page_state;
mod report;

// Re-export main types
pub use page_state::{FailureKind, PageOutcome};
pub use report::{CrawlReport, TaskFailure};
