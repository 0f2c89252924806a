//! Output module for per-page files and the combined dataset
//!
//! This module handles:
//! - Serializing one page's records to its own file
//! - Merging all page files into the final dataset
//! - Preparing and cleaning the working directories
//! - Summarizing a finished run

mod aggregate;
mod error;
mod format;
mod record;
pub mod stats;
mod workspace;
mod writer;

pub use aggregate::{
    aggregate, collect_page_files, combined_output_path, read_page_file, AggregateSummary,
};
pub use error::{AggregationError, AggregationResult, WriteError, WriteResult};
pub use format::OutputFormat;
pub use record::{PageRecord, RecordView};
pub use stats::{print_summary, CrawlSummary};
pub use workspace::{clean_dir, finish_workspace, prepare_workspace};
pub use writer::{sanitize_title, PageWriter, WriteOutcome};
