//! Wiki-Harvest: a section-level wiki scraper
//!
//! This crate crawls wiki-style sites from a set of seed pages, follows
//! same-site links, splits each page's main content into (heading, text)
//! records and merges the per-page files into a single dataset.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for a harvest run
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Aggregation failed: {0}")]
    Aggregation(#[from] output::AggregationError),

    #[error("No links provided")]
    NoSeeds,

    #[error("Workspace error for {path}: {source}")]
    Workspace {
        path: String,
        source: std::io::Error,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Unknown output format: {0}")]
    UnknownFormat(u8),
}

/// Errors that end a single crawl task
///
/// None of these abort the crawl; they are recorded in the run report.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Fetch(#[from] crawler::FetchError),

    #[error(transparent)]
    Write(#[from] output::WriteError),

    #[error("Permit pool closed before the task could start")]
    PoolClosed,
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use output::{OutputFormat, PageRecord};
pub use state::{CrawlReport, FailureKind, PageOutcome};
pub use url::VisitedSet;
