//! Per-item download decision.
//!
//! [`decide`] never fails: skips, download errors and filesystem errors all
//! come back as a [`JobResult`] so one bad item cannot stop the others.

use tracing::{debug, warn};
use url::Url;

use crate::fetch::Fetcher;
use crate::job::Job;
use crate::store;

/// Outcome of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResult {
    /// Id of the job that produced this result.
    pub id: usize,
    pub message: String,
    /// Worth showing to a human: a download or a hard failure.
    pub important: bool,
    /// A file was actually fetched. Triggers the worker cooldown.
    pub downloaded: bool,
}

impl JobResult {
    fn skipped(id: usize, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
            important: false,
            downloaded: false,
        }
    }

    fn failed(id: usize, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
            important: true,
            downloaded: false,
        }
    }

    fn fetched(id: usize, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
            important: true,
            downloaded: true,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.important && !self.downloaded
    }
}

const NOTHING_TO_DOWNLOAD: &str = "No file to download";

/// File extension of an enclosure URL, including the leading dot.
///
/// The query string is ignored and everything from the *first* `.` of the
/// last path segment is returned, so `show.part1.mp3` yields `.part1.mp3`.
/// Returns `None` when the URL does not parse or its last segment has no dot.
pub fn extension_from_url(href: &str) -> Option<String> {
    let url = Url::parse(href).ok()?;
    let file_name = url.path_segments()?.next_back()?;
    let dot = file_name.find('.')?;
    Some(file_name[dot..].to_string())
}

/// Download the job's first enclosure unless it is already on disk.
pub fn decide(job: &Job, fetcher: &dyn Fetcher) -> JobResult {
    let Some(enclosure) = job.item.primary_enclosure() else {
        return JobResult::skipped(job.id, NOTHING_TO_DOWNLOAD);
    };

    let Some(extension) = extension_from_url(&enclosure.url) else {
        debug!(url = %enclosure.url, "enclosure has no file extension");
        return JobResult::skipped(job.id, NOTHING_TO_DOWNLOAD);
    };

    if let Err(e) = store::ensure_dir(&job.destination) {
        warn!(error = %e, "cannot prepare destination");
        return JobResult::failed(job.id, e.to_string());
    }

    let path = store::media_path(&job.destination, &job.item.title, &extension);
    if store::exists(&path) {
        return JobResult::skipped(job.id, format!("Already downloaded {}", path.display()));
    }

    match fetcher.fetch(&enclosure.url, &path) {
        Ok(()) => JobResult::fetched(job.id, format!("downloaded: {}", job.item.title)),
        Err(e) => {
            warn!(url = %enclosure.url, error = %e, "download failed");
            JobResult::failed(job.id, e.to_string())
        }
    }
}
