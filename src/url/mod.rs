//! URL handling module for Wiki-Harvest
//!
//! URLs are deduplicated by their literal text, so this module deliberately
//! does no canonicalization. It provides:
//! - the concurrent [`VisitedSet`] used to claim URLs
//! - seed filtering
//! - resolution of site-relative links against the page they were found on

mod visited;

pub use visited::VisitedSet;

use url::Url;

/// Returns true if a seed entry may be scheduled
///
/// Anything not starting with `http` is silently ignored.
pub fn is_crawlable_seed(seed: &str) -> bool {
    seed.starts_with("http")
}

/// Returns the `scheme://host[:port]` prefix of an absolute URL
///
/// Returns `None` for URLs that fail to parse or have no network origin.
///
/// # Examples
///
/// ```
/// use wiki_harvest::url::site_origin;
///
/// assert_eq!(
///     site_origin("https://wiki.example.com/wiki/Page?x=1").as_deref(),
///     Some("https://wiki.example.com")
/// );
/// assert_eq!(
///     site_origin("http://127.0.0.1:8080/A").as_deref(),
///     Some("http://127.0.0.1:8080")
/// );
/// ```
pub fn site_origin(page_url: &str) -> Option<String> {
    let parsed = Url::parse(page_url).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(origin.ascii_serialization())
}

/// Joins a site-relative path onto an origin
///
/// This is plain concatenation: the path is kept exactly as it appeared in the
/// page, so the result is the dedup key for the linked page.
pub fn resolve_site_link(origin: &str, path: &str) -> String {
    format!("{}{}", origin, path)
}
