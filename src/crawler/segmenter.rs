//! Splitting a page's main content into (heading, text) sections
//!
//! The children of the content container are classified once into a
//! [`NodeKind`] and fed to a [`SectionBuilder`]. A section is every run of
//! content nodes between two headings; it is emitted when the heading changes
//! and once more at the end of the walk.

use crate::output::PageRecord;
use scraper::{ElementRef, Node};

/// Container tags that hold navigation or presentation, not prose
const EXCLUDED_TAGS: [&str; 4] = ["aside", "div", "figure", "blockquote"];

/// Sections under this heading (compared lowercased) are never emitted
const SEE_ALSO: &str = "see also";

/// Classification of one child node of the content container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `h1` through `h5`
    Heading(u8),
    /// One of the excluded container tags
    ExcludedContainer,
    /// Any other element; its text joins the current section
    OtherContent,
    /// Comments, text and every other non-element node
    NonElement,
}

impl NodeKind {
    /// Classifies an element by its tag name
    pub fn from_tag(name: &str) -> Self {
        match name {
            "h1" => Self::Heading(1),
            "h2" => Self::Heading(2),
            "h3" => Self::Heading(3),
            "h4" => Self::Heading(4),
            "h5" => Self::Heading(5),
            tag if EXCLUDED_TAGS.contains(&tag) => Self::ExcludedContainer,
            _ => Self::OtherContent,
        }
    }

    pub fn classify(node: &Node) -> Self {
        match node {
            Node::Element(element) => Self::from_tag(element.name()),
            _ => Self::NonElement,
        }
    }
}

/// A classified node together with its text content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    pub kind: NodeKind,
    pub text: String,
}

impl ContentBlock {
    pub fn new(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(NodeKind::Heading(level), text)
    }

    pub fn content(text: impl Into<String>) -> Self {
        Self::new(NodeKind::OtherContent, text)
    }

    /// Classifies an element and collects its text if the segmenter will use it
    pub fn from_element(element: ElementRef<'_>) -> Self {
        let kind = NodeKind::from_tag(element.value().name());
        let text = match kind {
            NodeKind::Heading(_) | NodeKind::OtherContent => element.text().collect(),
            _ => String::new(),
        };
        Self { kind, text }
    }
}

/// Accumulates sections for one page
#[derive(Debug)]
pub struct SectionBuilder {
    page_title: String,
    heading: String,
    section_text: String,
    records: Vec<PageRecord>,
}

impl SectionBuilder {
    /// Starts a page whose first section is headed by the page title
    pub fn new(page_title: &str) -> Self {
        Self {
            page_title: page_title.to_string(),
            heading: page_title.to_string(),
            section_text: String::new(),
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, block: &ContentBlock) {
        match block.kind {
            NodeKind::ExcludedContainer | NodeKind::NonElement => {}
            NodeKind::Heading(_) => {
                let heading = clean_heading(&block.text);
                if heading != self.heading {
                    self.flush();
                    self.heading = heading;
                }
            }
            NodeKind::OtherContent => self.section_text.push_str(&clean_text(&block.text)),
        }
    }

    /// Emits the trailing open section and returns all records
    pub fn finish(mut self) -> Vec<PageRecord> {
        self.flush();
        self.records
    }

    fn flush(&mut self) {
        let text = std::mem::take(&mut self.section_text);
        if text.is_empty() || self.heading.to_lowercase() == SEE_ALSO {
            return;
        }
        self.records
            .push(PageRecord::new(self.heading.as_str(), text, self.page_title.as_str()));
    }
}

/// Segments a sequence of already classified blocks
pub fn segment_blocks<'a, I>(page_title: &str, blocks: I) -> Vec<PageRecord>
where
    I: IntoIterator<Item = &'a ContentBlock>,
{
    let mut builder = SectionBuilder::new(page_title);
    for block in blocks {
        builder.push(block);
    }
    builder.finish()
}

/// Segments the direct children of every content container, in document order
pub fn segment_containers(page_title: &str, containers: &[ElementRef<'_>]) -> Vec<PageRecord> {
    let mut builder = SectionBuilder::new(page_title);
    for container in containers {
        for child in container.children() {
            let block = match ElementRef::wrap(child) {
                Some(element) => ContentBlock::from_element(element),
                None => ContentBlock::new(NodeKind::classify(child.value()), ""),
            };
            builder.push(&block);
        }
    }
    builder.finish()
}

/// Heading text: trimmed, with footnote-link `[]` remnants removed
fn clean_heading(text: &str) -> String {
    text.trim().replace("[]", "")
}

/// Body text: trimmed, with newlines removed
fn clean_text(text: &str) -> String {
    text.trim().replace('\n', "")
}
