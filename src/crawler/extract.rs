//! Turning a fetched page into records and links
//!
//! The document tree is built and dropped inside [`PageExtractor::extract`], so
//! nothing borrowed from it outlives the call.

use crate::config::{validate_selector, ExtractConfig};
use crate::crawler::links::extract_links;
use crate::crawler::segmenter::segment_containers;
use crate::output::PageRecord;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// Everything the crawler needs from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// `None` when the title selector matched no text
    pub title: Option<String>,

    /// Always empty for an untitled page
    pub records: Vec<PageRecord>,

    /// Site-relative links, deduplicated in first-seen order
    pub links: Vec<String>,
}

/// Parses pages with pre-compiled selectors
#[derive(Debug)]
pub struct PageExtractor {
    title: Selector,
    content: Selector,
    anchors: Selector,
}

impl PageExtractor {
    pub fn new(config: &ExtractConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            title: validate_selector(&config.title_selector)?,
            content: validate_selector(&config.content_selector)?,
            anchors: validate_selector("a[href]")?,
        })
    }

    /// Decodes and parses a response body
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected, so a page in
    /// a legacy encoding still yields its links.
    pub fn extract(&self, url: &str, body: &[u8]) -> ExtractedPage {
        self.extract_html(url, &String::from_utf8_lossy(body))
    }

    /// Parses an HTML document
    ///
    /// Links are extracted from every page. Records need a title: an untitled
    /// page yields none. A page without a content container yields neither.
    pub fn extract_html(&self, url: &str, html: &str) -> ExtractedPage {
        let document = Html::parse_document(html);

        let containers: Vec<ElementRef<'_>> = document.select(&self.content).collect();
        if containers.is_empty() {
            tracing::debug!("No content container on {}", url);
        }

        let title = self.page_title(&document);
        let records = match &title {
            Some(title) => segment_containers(title, &containers),
            None => Vec::new(),
        };
        let links = extract_links(&containers, &self.anchors);

        ExtractedPage {
            title,
            records,
            links,
        }
    }

    /// Text of every title match, joined and trimmed
    fn page_title(&self, document: &Html) -> Option<String> {
        let title: String = document
            .select(&self.title)
            .flat_map(|element| element.text())
            .collect();
        let title = title.trim();
        (!title.is_empty()).then(|| title.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Old Town - Example Wiki</title></head>
<body>
  <h1 id="firstHeading"><span class="mw-page-title-main">Old Town</span></h1>
  <main class="page__main">
    <div class="mw-parser-output">
      <aside class="portable-infobox"><a href="/Infobox_Link">infobox</a></aside>
      <p>Old Town is the oldest district of <a href="/Harbor">the harbor</a>.</p>
      <h2><span>History</span></h2>
      <p>Founded by <a href="/Fishers">fishers</a>.</p>
      <figure><a href="/File:Old_Town.jpg">image</a></figure>
      <h2>See also</h2>
      <ul><li><a href="/Harbor">Harbor</a></li><li><a href="/New_Town">New Town</a></li></ul>
    </div>
  </main>
  <footer><a href="/Footer_Link">footer</a></footer>
</body>
</html>"#;

    fn extractor() -> PageExtractor {
        PageExtractor::new(&ExtractConfig::default()).unwrap()
    }

    #[test]
    fn test_extract_wiki_page() {
        let page = extractor().extract("https://wiki.example.com/Old_Town", PAGE.as_bytes());

        assert_eq!(page.title.as_deref(), Some("Old Town"));
        assert_eq!(
            page.records,
            vec![
                PageRecord::new(
                    "Old Town",
                    "Old Town is the oldest district of the harbor.",
                    "Old Town"
                ),
                PageRecord::new("History", "Founded by fishers.", "Old Town"),
            ]
        );
        assert_eq!(
            page.links,
            vec!["/Infobox_Link", "/Harbor", "/Fishers", "/New_Town"]
        );
    }

    #[test]
    fn test_untitled_page_keeps_links() {
        let page = extractor().extract_html(
            "https://wiki.example.com/Category:Towns",
            r#"<html><body><main class="page__main"><div class="mw-parser-output">
               <p>Towns: <a href="/Old_Town">Old Town</a></p></div></main></body></html>"#,
        );
        assert_eq!(page.title, None);
        assert!(page.records.is_empty());
        assert_eq!(page.links, vec!["/Old_Town"]);
    }

    #[test]
    fn test_non_utf8_body_is_decoded_lossily() {
        // "Café" in Latin-1, linking onward
        let mut body = b"<html><body><h1 id=\"firstHeading\"><span>Caf".to_vec();
        body.push(0xe9);
        body.extend_from_slice(
            b"</span></h1><main class=\"page__main\"><div class=\"mw-parser-output\">\
              <p>Menu <a href=\"/B\">next</a></p></div></main></body></html>",
        );

        let page = extractor().extract("https://wiki.example.com/Cafe", &body);

        assert_eq!(page.title.as_deref(), Some("Caf\u{fffd}"));
        assert_eq!(page.links, vec!["/B"]);
        assert_eq!(
            page.records,
            vec![PageRecord::new("Caf\u{fffd}", "Menu next", "Caf\u{fffd}")]
        );
    }

    #[test]
    fn test_page_without_content_container() {
        let page = extractor().extract_html(
            "https://wiki.example.com/Empty",
            r#"<body><h1 id="firstHeading"><span>Empty</span></h1><a href="/Elsewhere">x</a></body>"#,
        );

        assert_eq!(page.title.as_deref(), Some("Empty"));
        assert!(page.records.is_empty());
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_custom_selectors() {
        let config = ExtractConfig {
            title_selector: "h1.title".to_string(),
            content_selector: "article".to_string(),
        };
        let page = PageExtractor::new(&config)
            .unwrap()
            .extract_html(
                "https://docs.example.com/x",
                r#"<body><h1 class="title"> Guide </h1><article><p>Intro</p><h3>Setup</h3><p>Steps</p></article></body>"#,
            );

        assert_eq!(page.title.as_deref(), Some("Guide"));
        assert_eq!(
            page.records,
            vec![
                PageRecord::new("Guide", "Intro", "Guide"),
                PageRecord::new("Setup", "Steps", "Guide"),
            ]
        );
    }

    #[test]
    fn test_invalid_selector_config() {
        let config = ExtractConfig {
            title_selector: "h1[".to_string(),
            ..ExtractConfig::default()
        };
        assert!(matches!(
            PageExtractor::new(&config),
            Err(ConfigError::InvalidSelector { .. })
        ));
    }
}
