//! Same-site link extraction
//!
//! Only site-relative hrefs (starting with `/`) are followed. Image links are
//! dropped. Resolution to absolute URLs happens in the coordinator, against the
//! page the links were found on.

use scraper::{ElementRef, Selector};
use std::collections::HashSet;

const IMAGE_SUFFIXES: [&str; 2] = [".jpg", ".png"];

/// Returns true for a site-relative href that is not an image
pub fn is_site_link(href: &str) -> bool {
    if !href.starts_with('/') {
        return false;
    }
    let lower = href.to_lowercase();
    !IMAGE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

/// Filters hrefs to site links, dropping duplicates but keeping first-seen order
///
/// # Examples
///
/// ```
/// use wiki_harvest::crawler::filter_site_links;
///
/// let links = filter_site_links(["/A", "/A", "/map.PNG", "https://elsewhere.org/", "/B"]);
/// assert_eq!(links, vec!["/A", "/B"]);
/// ```
pub fn filter_site_links<'a, I>(hrefs: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    hrefs
        .into_iter()
        .filter(|href| is_site_link(href))
        .filter(|href| seen.insert(*href))
        .map(str::to_string)
        .collect()
}

/// Collects site links from the anchors nested in each container's child elements
///
/// Anchors that are themselves direct children of a container are not searched.
pub fn extract_links(containers: &[ElementRef<'_>], anchors: &Selector) -> Vec<String> {
    filter_site_links(
        containers
            .iter()
            .flat_map(|container| container.children().filter_map(ElementRef::wrap))
            .flat_map(|child| child.select(anchors))
            .filter_map(|anchor| anchor.value().attr("href")),
    )
}
