//! Feed loading and parsing.
//!
//! [`FeedSource`] pulls the document through the [`FeedCache`] and turns it
//! into a [`Feed`]. Format-specific conversion lives in sub-modules:
//! [`rss`] for RSS 2.0 and [`atom`] for Atom.
//!
//! ## For contributors — adding a format
//!
//! 1. Add a file in this directory with a `parse(&[u8]) -> Result<Feed, _>`.
//! 2. Try it from [`parse_feed`] after the existing formats and record its
//!    error in [`FeedError::Parse`].

mod atom;
mod feed;
mod rss;

pub use feed::{Feed, Item};

use std::fs;

use tracing::debug;

use crate::cache::FeedCache;
use crate::error::FeedError;

/// Parse a feed document, trying RSS first and falling back to Atom.
pub fn parse_feed(bytes: &[u8]) -> Result<Feed, FeedError> {
    let rss_err = match rss::parse(bytes) {
        Ok(feed) => return Ok(feed),
        Err(e) => e,
    };
    debug!(error = %rss_err, "not RSS, trying Atom");

    atom::parse(bytes).map_err(|atom_err| FeedError::Parse {
        rss: rss_err.to_string(),
        atom: atom_err.to_string(),
    })
}

/// A single feed URL, read through the local cache.
pub struct FeedSource<'a> {
    url: String,
    cache: FeedCache<'a>,
}

impl<'a> FeedSource<'a> {
    pub fn new(url: impl Into<String>, cache: FeedCache<'a>) -> Self {
        Self {
            url: url.into(),
            cache,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Resolve the cached document and parse it.
    pub fn load(&self) -> Result<Feed, FeedError> {
        let path = self.cache.resolve(&self.url)?;
        let bytes = fs::read(&path).map_err(|source| FeedError::Read {
            path: path.clone(),
            source,
        })?;

        let feed = parse_feed(&bytes)?;
        debug!(title = %feed.title, items = feed.items.len(), "parsed feed");
        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::FakeFetcher;

    const URL: &str = "https://example.com/feed.xml";

    const RSS: &str = r#"<rss version="2.0"><channel><title>My Show</title>
<item><title>Ep 1</title><enclosure url="https://x.com/a.mp3" length="1" type="audio/mpeg"/></item>
</channel></rss>"#;

    #[test]
    fn parse_feed_falls_back_to_atom() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>A</title>
<id>urn:x</id><updated>2024-01-01T00:00:00Z</updated></feed>"#;

        let feed = parse_feed(xml.as_bytes()).unwrap();

        assert_eq!(feed.title, "A");
        assert!(feed.items.is_empty());
    }

    #[test]
    fn parse_feed_reports_both_errors() {
        let err = parse_feed(b"<html><body>nope</body></html>").unwrap_err();
        assert!(matches!(err, FeedError::Parse { .. }));
    }

    #[test]
    fn load_fetches_and_parses() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher::new().serve(URL, RSS);
        let source = FeedSource::new(URL, FeedCache::new(tmp.path(), &fetcher));

        let feed = source.load().unwrap();

        assert_eq!(feed.title, "My Show");
        assert_eq!(feed.items[0].enclosures[0].url, "https://x.com/a.mp3");
    }

    #[test]
    fn load_uses_cache_on_second_call() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher::new().serve(URL, RSS);
        let source = FeedSource::new(URL, FeedCache::new(tmp.path(), &fetcher));

        source.load().unwrap();
        source.load().unwrap();

        assert_eq!(fetcher.calls(), 1);
    }

    #[test]
    fn load_propagates_fetch_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let fetcher = FakeFetcher::new();
        let source = FeedSource::new(URL, FeedCache::new(tmp.path(), &fetcher));

        assert!(matches!(source.load(), Err(FeedError::Fetch(_))));
    }
}
