//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock wiki servers and run the full
//! crawl, write and combine cycle end-to-end.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiki_harvest::config::{Config, CrawlerConfig, OutputConfig};
use wiki_harvest::crawler::{run_harvest, Coordinator};
use wiki_harvest::output::read_page_file;
use wiki_harvest::{FailureKind, OutputFormat, PageRecord};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Renders a page in the default wiki layout
fn wiki_page(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>{title} | Test Wiki</title></head><body>
<nav><a href="/Nav_Only">nav</a></nav>
<h1 id="firstHeading"><span class="mw-page-title-main">{title}</span></h1>
<main class="page__main"><div class="mw-parser-output">{content}</div></main>
</body></html>"#
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Creates a test configuration writing under `root`
fn create_test_config(root: &Path, seeds: Vec<String>) -> Config {
    Config {
        seeds,
        crawler: CrawlerConfig {
            max_concurrent_pages_open: 4,
            request_timeout_secs: Some(10),
            ..CrawlerConfig::default()
        },
        output: OutputConfig {
            temp_dir: root.join("temp").display().to_string(),
            out_dir: root.join("out").display().to_string(),
            keep_temp: true,
            ..OutputConfig::default()
        },
        ..Config::default()
    }
}

fn sorted(mut records: Vec<PageRecord>) -> Vec<PageRecord> {
    records.sort_by(|a, b| (&a.page_title, &a.heading).cmp(&(&b.page_title, &b.heading)));
    records
}

#[tokio::test]
async fn test_link_cycle_fetches_each_page_once() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_page(
        &server,
        "/Page_A",
        wiki_page(
            "Page A",
            r#"<p>Alpha intro links to <a href="/Page_B">B</a>.</p>
               <h2>Details</h2><p>Alpha details.</p>"#,
        ),
    )
    .await;
    mount_page(
        &server,
        "/Page_B",
        wiki_page(
            "Page B",
            r#"<p>Beta links back to <a href="/Page_A">A</a> and <a href="/Page_B">itself</a>.</p>"#,
        ),
    )
    .await;

    let config = create_test_config(
        root.path(),
        vec![
            format!("{}/Page_A", server.uri()),
            format!("{}/Page_B", server.uri()),
        ],
    );
    let summary = run_harvest(config, false).await.expect("Crawl failed");

    assert_eq!(summary.urls_claimed, 2);
    assert_eq!(summary.pages_written, 2);
    assert_eq!(summary.records_written, 3);
    assert_eq!(summary.failure_count(), 0);

    // One file per page, kept because keep_temp is set
    assert!(root.path().join("temp/page_a.json").exists());
    assert!(root.path().join("temp/page_b.json").exists());

    let combined = summary.combined.expect("Dataset should be written");
    assert_eq!(combined.path, root.path().join("out/dataset.json"));
    assert_eq!(combined.files, 2);

    let records = read_page_file(&combined.path, OutputFormat::Json).unwrap();
    assert_eq!(
        sorted(records),
        vec![
            PageRecord::new("Details", "Alpha details.", "Page A"),
            PageRecord::new("Page A", "Alpha intro links to B.", "Page A"),
            PageRecord::new("Page B", "Beta links back to A and itself.", "Page B"),
        ]
    );
}

#[tokio::test]
async fn test_failures_are_isolated() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_page(
        &server,
        "/Hub",
        wiki_page(
            "Hub",
            r#"<p><a href="/Latin">latin</a> <a href="/Good">good</a></p>"#,
        ),
    )
    .await;
    // Latin-1 bytes: every char below 0x100 maps to one byte
    let latin1: Vec<u8> = wiki_page("Café", r#"<p>Crème <a href="/Good">good</a></p>"#)
        .chars()
        .map(|c| c as u8)
        .collect();
    Mock::given(method("GET"))
        .and(path("/Latin"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(latin1))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/Good", wiki_page("Good", "<p>Still crawled.</p>")).await;

    let config = create_test_config(
        root.path(),
        vec![
            format!("{}/Hub", server.uri()),
            // nothing listens on port 1
            "http://127.0.0.1:1/Down".to_string(),
        ],
    );
    let summary = run_harvest(config, false).await.expect("Crawl failed");

    assert_eq!(summary.urls_claimed, 4);
    assert_eq!(summary.pages_written, 3);
    assert_eq!(summary.failure_count(), 1);
    assert_eq!(summary.failures_by_kind.get(&FailureKind::Fetch), Some(&1));
    assert_eq!(summary.failures[0].url, "http://127.0.0.1:1/Down");

    // undecodable bytes are replaced, the page is still written
    assert!(root.path().join("temp/caf\u{fffd}.json").exists());
    assert_eq!(summary.combined.unwrap().records, 3);
}

#[tokio::test]
async fn test_untitled_page_links_are_followed() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/Untitled"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><main class="page__main"><div class="mw-parser-output">
               <p><a href="/Linked">linked</a></p></div></main></body></html>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/Linked", wiki_page("Linked", "<p>Reached.</p>")).await;

    let config = create_test_config(root.path(), vec![format!("{}/Untitled", server.uri())]);
    let summary = run_harvest(config, false).await.expect("Crawl failed");

    assert_eq!(summary.urls_claimed, 2);
    assert_eq!(summary.pages_untitled, 1);
    assert_eq!(summary.pages_written, 1);
    assert_eq!(summary.failure_count(), 0);
    assert_eq!(summary.combined.unwrap().records, 1);
}

#[tokio::test]
async fn test_non_page_links_are_not_followed() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_page(
        &server,
        "/Gallery",
        wiki_page(
            "Gallery",
            r#"<p>Maps: <a href="/images/Map.PNG">map</a> <a href="/images/photo.jpg">photo</a>
               <a href="https://elsewhere.example.org/Page">elsewhere</a>
               <a href="Relative_Page">relative</a></p>"#,
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/images/Map.PNG"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/images/photo.jpg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/Nav_Only"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(
        root.path(),
        vec![
            format!("{}/Gallery", server.uri()),
            "ftp://example.org/Ignored".to_string(),
        ],
    );
    let summary = run_harvest(config, false).await.expect("Crawl failed");

    assert_eq!(summary.urls_claimed, 1);
    assert_eq!(summary.pages_written, 1);
}

#[tokio::test]
async fn test_resume_keeps_existing_page_files() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_page(
        &server,
        "/Page_A",
        wiki_page("Page A", "<p>Fresh text.</p>"),
    )
    .await;

    let temp_dir: PathBuf = root.path().join("temp");
    std::fs::create_dir_all(&temp_dir).unwrap();
    let existing = r#"[{"heading":"Page A","text":"Earlier text.","title":"Page A"}]"#;
    std::fs::write(temp_dir.join("page_a.json"), existing).unwrap();

    let config = create_test_config(root.path(), vec![format!("{}/Page_A", server.uri())]);
    let coordinator = Coordinator::new(config, true).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert_eq!(summary.pages_written, 0);
    assert_eq!(summary.pages_already_present, 1);
    assert_eq!(
        std::fs::read_to_string(temp_dir.join("page_a.json")).unwrap(),
        existing
    );

    let combined = summary.combined.unwrap();
    let records = read_page_file(&combined.path, OutputFormat::Json).unwrap();
    assert_eq!(
        records,
        vec![PageRecord::new("Page A", "Earlier text.", "Page A")]
    );
}

#[tokio::test]
async fn test_fresh_run_cleans_stale_page_files() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_page(&server, "/Page_A", wiki_page("Page A", "<p>Fresh text.</p>")).await;

    let temp_dir = root.path().join("temp");
    std::fs::create_dir_all(&temp_dir).unwrap();
    std::fs::write(temp_dir.join("stale.json"), "[]").unwrap();

    let mut config = create_test_config(root.path(), vec![format!("{}/Page_A", server.uri())]);
    config.output.keep_temp = false;
    let summary = run_harvest(config, false).await.expect("Crawl failed");

    let combined = summary.combined.unwrap();
    assert_eq!(combined.files, 1);
    assert_eq!(combined.records, 1);
    assert!(!temp_dir.exists());
}

#[tokio::test]
async fn test_json_lines_without_titles() {
    let server = MockServer::start().await;
    let root = TempDir::new().unwrap();

    mount_page(
        &server,
        "/Lines",
        wiki_page(
            "Lines",
            "<p>First.</p><h2>Second</h2><p>Two.</p><h2>See also</h2><p>Skipped.</p>",
        ),
    )
    .await;

    let mut config = create_test_config(root.path(), vec![format!("{}/Lines", server.uri())]);
    config.output.format = OutputFormat::JsonLines;
    config.output.include_title = false;
    config.output.dataset_name = "wiki".to_string();

    let summary = run_harvest(config, false).await.expect("Crawl failed");

    assert!(root.path().join("temp/lines.jsonl").exists());
    let combined = summary.combined.unwrap();
    assert_eq!(combined.path, root.path().join("out/wiki.jsonl"));

    let content = std::fs::read_to_string(&combined.path).unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(
        lines,
        vec![
            serde_json::json!({"heading": "Lines", "text": "First."}),
            serde_json::json!({"heading": "Second", "text": "Two."}),
        ]
    );
}
