use crate::output::OutputFormat;
use serde::Deserialize;

/// Default size of the permit pool
pub const DEFAULT_MAX_CONCURRENT_PAGES: u32 = 50;

/// Main configuration structure for Wiki-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed URLs; entries not starting with `http` are never scheduled
    pub seeds: Vec<String>,
    pub crawler: CrawlerConfig,
    pub extract: ExtractConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-concurrent-pages-open")]
    pub max_concurrent_pages_open: u32,

    /// Per-request timeout in seconds; no timeout when unset
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_pages_open: DEFAULT_MAX_CONCURRENT_PAGES,
            request_timeout_secs: None,
            user_agent: format!("wiki-harvest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Where on a page the title and the main content live
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// CSS selector whose text is the page title
    #[serde(rename = "title-selector")]
    pub title_selector: String,

    /// CSS selector of the main content container(s)
    #[serde(rename = "content-selector")]
    pub content_selector: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            title_selector: "#firstHeading span".to_string(),
            content_selector: ".page__main div.mw-parser-output".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding one file per crawled page
    #[serde(rename = "temp-dir")]
    pub temp_dir: String,

    /// Directory receiving the combined dataset
    #[serde(rename = "out-dir")]
    pub out_dir: String,

    /// Base name of the combined dataset file
    #[serde(rename = "dataset-name")]
    pub dataset_name: String,

    /// Format of both per-page files and the combined dataset
    pub format: OutputFormat,

    /// Keep the per-page files after combining
    #[serde(rename = "keep-temp")]
    pub keep_temp: bool,

    /// Emit the `title` field on every record
    #[serde(rename = "include-title")]
    pub include_title: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            temp_dir: "./temp".to_string(),
            out_dir: "./out".to_string(),
            dataset_name: "dataset".to_string(),
            format: OutputFormat::Json,
            keep_temp: false,
            include_title: true,
        }
    }
}
