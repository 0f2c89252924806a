//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties the pieces of a run together:
//! - Preparing the working directories
//! - Admitting seeds and recursively following discovered links
//! - Waiting for every crawl task to finish
//! - Combining the per-page files and summarizing the run
//!
//! All shared state lives in one [`CrawlSession`] that every task holds an
//! `Arc` to. Nothing is global.

use crate::config::{validate, Config};
use crate::crawler::extract::PageExtractor;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::scheduler::{PermitPool, TaskGroup};
use crate::output::{
    aggregate, combined_output_path, finish_workspace, prepare_workspace, CrawlSummary,
    PageWriter, WriteOutcome,
};
use crate::state::{CrawlReport, PageOutcome};
use crate::url::{is_crawlable_seed, resolve_site_link, site_origin, VisitedSet};
use crate::{HarvestError, TaskError};
use chrono::Utc;
use reqwest::Client;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

/// Shared state of one crawl
///
/// Owns the visited set, the permit pool and the task group, plus everything a
/// task needs to fetch, extract and write a page.
#[derive(Debug)]
pub struct CrawlSession {
    client: Client,
    visited: VisitedSet,
    permits: PermitPool,
    tasks: TaskGroup,
    extractor: PageExtractor,
    writer: PageWriter,
    report: CrawlReport,
}

impl CrawlSession {
    /// Builds a session from a validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<CrawlSession>)` - Ready to admit seeds
    /// * `Err(HarvestError)` - The HTTP client or a selector could not be built
    pub fn new(config: &Config) -> Result<Arc<Self>, HarvestError> {
        let client = build_http_client(&config.crawler)?;
        let extractor = PageExtractor::new(&config.extract)?;
        let writer = PageWriter::new(
            &config.output.temp_dir,
            config.output.format,
            config.output.include_title,
        );

        Ok(Arc::new(Self {
            client,
            visited: VisitedSet::new(),
            permits: PermitPool::new(config.crawler.max_concurrent_pages_open as usize),
            tasks: TaskGroup::new(),
            extractor,
            writer,
            report: CrawlReport::new(),
        }))
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn report(&self) -> &CrawlReport {
        &self.report
    }

    /// Claims and spawns every crawlable seed
    ///
    /// Seeds not starting with `http` are skipped, as are repeated seeds.
    /// Returns the number of tasks spawned.
    pub fn admit_seeds(self: &Arc<Self>, seeds: &[String]) -> usize {
        let mut admitted = 0;
        for seed in seeds {
            if !is_crawlable_seed(seed) {
                tracing::debug!("Ignoring seed without http scheme: {}", seed);
                continue;
            }
            if self.visited.try_claim(seed) {
                self.spawn_page(seed.clone());
                admitted += 1;
            }
        }
        admitted
    }

    /// Resolves once every spawned task, including descendants, has ended
    pub async fn wait(&self) {
        self.tasks.wait().await;
    }

    fn spawn_page(self: &Arc<Self>, url: String) {
        self.tasks.spawn(crawl_page(Arc::clone(self), url));
    }

    /// Fetches, extracts and writes one page, then follows its links
    ///
    /// An untitled page is not written but its links are still followed. The
    /// permit is held for the whole task and released when it returns,
    /// whichever way it returns.
    async fn process_page(self: &Arc<Self>, url: &str) -> Result<PageOutcome, TaskError> {
        let _permit = self.permits.acquire().await?;

        let raw = fetch_page(&self.client, url).await?;
        let page = self.extractor.extract(url, &raw.body);

        let outcome = match &page.title {
            Some(title) => match self.writer.write(title, &page.records)? {
                WriteOutcome::Created { path, records } => {
                    tracing::debug!("Wrote {} records to {}", records, path.display());
                    PageOutcome::Written { records }
                }
                WriteOutcome::AlreadyPresent { path } => {
                    tracing::debug!("{} already exists, skipping write", path.display());
                    PageOutcome::AlreadyPresent
                }
            },
            None => {
                tracing::warn!("No page title found at {}, following links only", url);
                PageOutcome::Untitled
            }
        };

        self.follow_links(url, &page.links);
        Ok(outcome)
    }

    /// Claims and spawns each link not seen before
    ///
    /// Links are resolved against the origin of `page_url`, the URL this task
    /// was given.
    fn follow_links(self: &Arc<Self>, page_url: &str, links: &[String]) {
        let Some(origin) = site_origin(page_url) else {
            tracing::warn!("Cannot resolve links from {}", page_url);
            return;
        };

        let mut spawned = 0;
        for link in links {
            let target = resolve_site_link(&origin, link);
            if self.visited.try_claim(&target) {
                self.spawn_page(target);
                spawned += 1;
            }
        }

        if spawned > 0 {
            tracing::debug!("{} new links from {}", spawned, page_url);
        }
    }
}

/// One crawl task
///
/// Failures end this task only: they are logged, recorded in the report and
/// never reach sibling tasks or the caller.
fn crawl_page(session: Arc<CrawlSession>, url: String) -> Pin<Box<dyn Future<Output = ()> + Send>> {
    Box::pin(async move {
        tracing::debug!("Processing URL: {}", url);
        match session.process_page(&url).await {
            Ok(outcome) => session.report.record_outcome(outcome),
            Err(e) => {
                tracing::error!("Error processing {}: {}", url, e);
                session.report.record_failure(&url, &e);
            }
        }
    })
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    session: Arc<CrawlSession>,
    resume: bool,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    /// * `resume` - Keep page files from an earlier run instead of cleaning them
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - No seeds, invalid configuration or HTTP client failure
    pub fn new(config: Config, resume: bool) -> Result<Self, HarvestError> {
        if config.seeds.is_empty() {
            return Err(HarvestError::NoSeeds);
        }
        validate(&config)?;
        let session = CrawlSession::new(&config)?;

        Ok(Self {
            config: Arc::new(config),
            session,
            resume,
        })
    }

    pub fn session(&self) -> &Arc<CrawlSession> {
        &self.session
    }

    /// Runs the crawl to completion and combines the results
    ///
    /// Per-page failures are collected in the summary. Only workspace and
    /// aggregation failures end the run with an error; in that case the
    /// temporary directory is left in place.
    pub async fn run(&self) -> Result<CrawlSummary, HarvestError> {
        let started_at = Utc::now();
        let output = &self.config.output;

        prepare_workspace(output, self.resume)?;

        let admitted = self.session.admit_seeds(&self.config.seeds);
        if self.session.visited.is_empty() {
            tracing::warn!("No crawlable seeds; nothing to fetch");
        } else {
            tracing::info!(
                "Starting crawl from {} seeds with {} permits, writing pages to {}",
                admitted,
                self.session.permits.capacity(),
                self.session.writer.dir().display()
            );
        }

        self.session.wait().await;
        tracing::debug!("{} crawl tasks finished", self.session.tasks.spawned());

        let mut summary =
            CrawlSummary::from_report(&self.session.report, self.session.visited.len(), started_at);
        tracing::info!(
            "Crawl completed: {} pages written, {} already present, {} failed in {}s",
            summary.pages_written,
            summary.pages_already_present,
            summary.failure_count(),
            summary.duration_seconds()
        );

        let dataset_path =
            combined_output_path(Path::new(&output.out_dir), &output.dataset_name, output.format);
        let combined = aggregate(
            Path::new(&output.temp_dir),
            &dataset_path,
            output.format,
            output.include_title,
        )?;

        finish_workspace(output)?;

        summary.combined = Some(combined);
        summary.finished_at = Utc::now();
        Ok(summary)
    }
}

/// Runs a complete harvest
///
/// # Example
///
/// ```no_run
/// use wiki_harvest::config::load_config;
/// use wiki_harvest::crawler::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let summary = run_harvest(config, false).await?;
/// println!("{} records", summary.records_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config, resume: bool) -> Result<CrawlSummary, HarvestError> {
    Coordinator::new(config, resume)?.run().await
}
