//! Time-to-live cache for the feed document.
//!
//! The feed is stored under `<base>/feeds/<md5 of the feed url>`. The key
//! depends only on the URL, never on the content, and staleness is judged
//! purely on the file's modification time: there is no conditional GET.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{FetchError, FileSystemError};
use crate::fetch::Fetcher;
use crate::store;

/// Cached feeds older than this are fetched again.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const FEEDS_DIR: &str = "feeds";

/// Stable, content-independent cache key for a feed URL.
pub fn feed_key(feed_url: &str) -> String {
    format!("{:x}", md5::compute(feed_url.as_bytes()))
}

/// Local copy of feed documents, refreshed once older than `max_age`.
///
/// Documents are written straight to their final path by the [`Fetcher`]
/// and never checked: whatever parses is reused until it goes stale.
pub struct FeedCache<'a> {
    base: PathBuf,
    fetcher: &'a dyn Fetcher,
    max_age: Duration,
}

impl<'a> FeedCache<'a> {
    pub fn new(base: impl Into<PathBuf>, fetcher: &'a dyn Fetcher) -> Self {
        Self {
            base: base.into(),
            fetcher,
            max_age: DEFAULT_MAX_AGE,
        }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Path the document for `feed_url` is (or will be) cached at.
    pub fn path_for(&self, feed_url: &str) -> PathBuf {
        self.base.join(FEEDS_DIR).join(feed_key(feed_url))
    }

    /// Return a local copy of the feed, fetching it when missing or stale.
    pub fn resolve(&self, feed_url: &str) -> Result<PathBuf, FetchError> {
        let dir = self.base.join(FEEDS_DIR);
        store::ensure_dir(&dir)
            .map_err(|FileSystemError::CreateDir { path, source }| FetchError::Io { path, source })?;

        let path = self.path_for(feed_url);
        match modified(&path) {
            None => {
                info!(path = %path.display(), "downloading feed contents");
                self.fetcher.fetch(feed_url, &path)?;
            }
            Some(mtime) if self.is_stale(mtime) => {
                info!(
                    path = %path.display(),
                    cached_at = %DateTime::<Utc>::from(mtime),
                    "refreshing feed contents"
                );
                self.fetcher.fetch(feed_url, &path)?;
            }
            Some(mtime) => {
                debug!(
                    path = %path.display(),
                    cached_at = %DateTime::<Utc>::from(mtime),
                    "using cached feed"
                );
            }
        }

        Ok(path)
    }

    fn is_stale(&self, mtime: SystemTime) -> bool {
        // A timestamp in the future is treated as fresh.
        SystemTime::now()
            .duration_since(mtime)
            .map(|age| age > self.max_age)
            .unwrap_or(false)
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
