use crate::config::types::{Config, CrawlerConfig, ExtractConfig, OutputConfig};
use crate::ConfigError;
use scraper::Selector;
use std::path::{Component, Path, PathBuf};

/// Upper bound on the permit pool
const MAX_CONCURRENT_PAGES: u32 = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_extract_config(&config.extract)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_pages_open < 1 || config.max_concurrent_pages_open > MAX_CONCURRENT_PAGES
    {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_pages_open must be between 1 and {}, got {}",
            MAX_CONCURRENT_PAGES, config.max_concurrent_pages_open
        )));
    }

    if config.request_timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be greater than zero when set".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_extract_config(config: &ExtractConfig) -> Result<(), ConfigError> {
    validate_selector(&config.title_selector)?;
    validate_selector(&config.content_selector)?;
    Ok(())
}

/// Checks that a CSS selector parses
pub(crate) fn validate_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.temp_dir.is_empty() {
        return Err(ConfigError::Validation(
            "temp_dir cannot be empty".to_string(),
        ));
    }

    if config.out_dir.is_empty() {
        return Err(ConfigError::Validation("out_dir cannot be empty".to_string()));
    }

    // temp_dir is removed after combining, taking anything inside it along
    if absolute_path(&config.out_dir).starts_with(absolute_path(&config.temp_dir)) {
        return Err(ConfigError::Validation(format!(
            "out_dir '{}' cannot be temp_dir '{}' or lie inside it",
            config.out_dir, config.temp_dir
        )));
    }

    validate_dataset_name(&config.dataset_name)
}

/// Joins a relative path onto the working directory and drops `.` components
fn absolute_path(path: &str) -> PathBuf {
    let path = Path::new(path);
    let joined = if path.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    };
    joined
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

/// The dataset name becomes a file name inside `out_dir`
fn validate_dataset_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "dataset_name cannot be empty".to_string(),
        ));
    }

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ConfigError::Validation(format!(
            "dataset_name must be a plain file name, got '{}'",
            name
        )));
    }

    Ok(())
}
