//! Configuration module for Wiki-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so a run can be configured entirely from the
//! command line.
//!
//! # Example
//!
//! ```no_run
//! use wiki_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Permit pool size: {}", config.crawler.max_concurrent_pages_open);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractConfig, OutputConfig, DEFAULT_MAX_CONCURRENT_PAGES,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
pub(crate) use validation::validate_selector;
