use dashmap::DashSet;

/// Concurrent set of claimed URLs
///
/// The key is the URL string exactly as first seen. `try_claim` is an atomic
/// check-and-set: for a given URL exactly one caller ever gets `true`, and that
/// caller owns fetching it. Entries are never evicted during a run.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: DashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url`, returning `true` only if no one claimed it before
    pub fn try_claim(&self, url: &str) -> bool {
        // cheap read path for the common already-seen case
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_first_claim_wins() {
        let visited = VisitedSet::new();
        assert!(visited.try_claim("https://wiki.example.com/A"));
        assert!(!visited.try_claim("https://wiki.example.com/A"));
        assert!(visited.contains("https://wiki.example.com/A"));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_no_normalization() {
        let visited = VisitedSet::new();
        assert!(visited.try_claim("https://wiki.example.com/A"));
        assert!(visited.try_claim("https://wiki.example.com/A/"));
        assert!(visited.try_claim("https://wiki.example.com/A?x=1"));
        assert!(visited.try_claim("https://wiki.example.com/A#top"));
        assert_eq!(visited.len(), 4);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_claims_succeed_once() {
        let visited = Arc::new(VisitedSet::new());
        let winners = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..64 {
            let visited = Arc::clone(&visited);
            let winners = Arc::clone(&winners);
            handles.push(tokio::spawn(async move {
                for i in 0..32 {
                    if visited.try_claim(&format!("https://wiki.example.com/Page_{}", i)) {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(winners.load(Ordering::SeqCst), 32);
        assert_eq!(visited.len(), 32);
    }
}
