//! One run of the pipeline: load the feed, build jobs, dispatch them.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cache::FeedCache;
use crate::config::Settings;
use crate::decide::JobResult;
use crate::dispatch::Dispatcher;
use crate::fetch::Fetcher;
use crate::job::{build_jobs, slug_collisions};
use crate::source::FeedSource;
use crate::store;

/// Counts of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub downloaded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    /// Downloads, failures and everything else (skips) are counted apart.
    pub fn from_results(results: &[JobResult]) -> Self {
        results.iter().fold(Self::default(), |mut s, r| {
            if r.downloaded {
                s.downloaded += 1;
            } else if r.is_failure() {
                s.failed += 1;
            } else {
                s.skipped += 1;
            }
            s
        })
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.failed + self.skipped
    }
}

/// A configured run. Holds no state between runs: everything persistent
/// lives on disk under the destination directory.
pub struct App {
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Run the whole pipeline.
    ///
    /// Feed-level problems (destination, fetch, parse) abort with an error.
    /// Per-item problems only show up in the returned results. `report` is
    /// called for every result as it comes in.
    pub fn run<F>(&self, fetcher: &dyn Fetcher, report: F) -> Result<Vec<JobResult>>
    where
        F: FnMut(&JobResult),
    {
        let settings = &self.settings;

        store::ensure_dir(&settings.destination).context("preparing destination directory")?;

        let cache = FeedCache::new(&settings.destination, fetcher).with_max_age(settings.max_age);
        let source = FeedSource::new(&settings.feed_url, cache);
        let feed = source
            .load()
            .with_context(|| format!("loading feed {}", source.url()))?;

        info!(title = %feed.title, items = feed.items.len(), "Checking feed contents...");

        for (slug, titles) in slug_collisions(&feed) {
            warn!(%slug, ?titles, "items share a file name and will overwrite or skip each other");
        }

        let jobs = build_jobs(&feed, &settings.destination);
        let dispatcher = Dispatcher::new(settings.workers, settings.cooldown);
        info!(jobs = jobs.len(), workers = dispatcher.workers(), "starting workers");
        let results = dispatcher.run(jobs, fetcher, report)?;

        let summary = Summary::from_results(&results);
        info!(
            downloaded = summary.downloaded,
            failed = summary.failed,
            skipped = summary.skipped,
            "run complete"
        );

        Ok(results)
    }
}
