//! Wiki-Harvest main entry point
//!
//! This is the command-line interface for the Wiki-Harvest section scraper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wiki_harvest::config::{load_config_with_hash, validate, Config};
use wiki_harvest::crawler::run_harvest;
use wiki_harvest::output::{combined_output_path, print_summary};
use wiki_harvest::url::is_crawlable_seed;
use wiki_harvest::{HarvestError, OutputFormat};

/// Wiki-Harvest: a section-level wiki scraper
///
/// Crawls a wiki from its seed pages, following same-site links, and writes
/// every page's (heading, text) sections into one dataset.
#[derive(Parser, Debug)]
#[command(name = "wiki-harvest")]
#[command(version)]
#[command(about = "A section-level wiki scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Seed URLs, added to those in the configuration file
    #[arg(long = "links", value_name = "URL", num_args = 1..)]
    links: Vec<String>,

    /// Directory for per-page files
    #[arg(long, value_name = "DIR")]
    temp_dir: Option<String>,

    /// Directory for the combined dataset
    #[arg(long, value_name = "DIR")]
    out_dir: Option<String>,

    /// Keep per-page files after combining
    #[arg(long)]
    keep_temp: bool,

    /// Output format: 0 = JSON array, 1 = JSON lines
    #[arg(long, value_name = "FORMAT")]
    out_format: Option<u8>,

    /// Base name of the combined dataset file
    #[arg(long, value_name = "NAME")]
    dataset_name: Option<String>,

    /// Maximum number of pages fetched at once
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Keep per-page files from an earlier run instead of cleaning them
    #[arg(long)]
    resume: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli)?;
    if config.seeds.is_empty() {
        return Err(HarvestError::NoSeeds.into());
    }
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let summary = run_harvest(config, cli.resume)
        .await
        .context("Harvest failed")?;

    if !cli.quiet {
        print_summary(&summary);
    }
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wiki_harvest=info,warn"),
            1 => EnvFilter::new("wiki_harvest=debug,info"),
            2 => EnvFilter::new("wiki_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Command-line flags win over the configuration file
fn apply_overrides(config: &mut Config, cli: &Cli) -> anyhow::Result<()> {
    config.seeds.extend(cli.links.iter().cloned());

    if let Some(dir) = &cli.temp_dir {
        config.output.temp_dir = dir.clone();
    }
    if let Some(dir) = &cli.out_dir {
        config.output.out_dir = dir.clone();
    }
    if cli.keep_temp {
        config.output.keep_temp = true;
    }
    if let Some(code) = cli.out_format {
        config.output.format = OutputFormat::try_from(code)?;
    }
    if let Some(name) = &cli.dataset_name {
        config.output.dataset_name = name.clone();
    }
    if let Some(n) = cli.concurrency {
        config.crawler.max_concurrent_pages_open = n;
    }
    Ok(())
}

/// Handles the --dry-run mode: shows the effective configuration and seeds
fn handle_dry_run(config: &Config) {
    println!("=== Wiki-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages_open
    );
    match config.crawler.request_timeout_secs {
        Some(secs) => println!("  Request timeout: {}s", secs),
        None => println!("  Request timeout: none"),
    }
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nExtraction:");
    println!("  Title selector: {}", config.extract.title_selector);
    println!("  Content selector: {}", config.extract.content_selector);

    let output = &config.output;
    println!("\nOutput:");
    println!("  Page files: {} ({})", output.temp_dir, output.format);
    println!(
        "  Dataset: {}",
        combined_output_path(
            std::path::Path::new(&output.out_dir),
            &output.dataset_name,
            output.format
        )
        .display()
    );
    println!("  Keep page files: {}", output.keep_temp);

    let (crawlable, ignored): (Vec<_>, Vec<_>) =
        config.seeds.iter().partition(|seed| is_crawlable_seed(seed));

    println!("\nSeeds ({}):", crawlable.len());
    for seed in &crawlable {
        println!("  * {}", seed);
    }
    if !ignored.is_empty() {
        println!("\nIgnored seeds ({}):", ignored.len());
        for seed in &ignored {
            println!("  - {}", seed);
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} seed URLs", crawlable.len());
}
