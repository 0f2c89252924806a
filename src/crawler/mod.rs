//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - Title, section and link extraction
//! - Bounded-concurrency task scheduling
//! - Overall crawl coordination

mod coordinator;
mod extract;
mod fetcher;
mod links;
mod scheduler;
mod segmenter;

pub use coordinator::{run_harvest, Coordinator, CrawlSession};
pub use extract::{ExtractedPage, PageExtractor};
pub use fetcher::{build_http_client, fetch_page, FetchError, RawPage};
pub use links::{extract_links, filter_site_links, is_site_link};
pub use scheduler::{PermitPool, TaskGroup};
pub use segmenter::{segment_blocks, segment_containers, ContentBlock, NodeKind, SectionBuilder};
