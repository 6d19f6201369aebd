//! Error types.
//!
//! Feed-level errors ([`FeedError`], [`FileSystemError`]) abort a run.
//! [`FetchError`] is also produced per enclosure, where the worker turns it
//! into a reported [`JobResult`](crate::decide::JobResult) instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A failed network retrieval.
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS, connection, TLS or body-read failure.
    #[error("could not reach {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a status outside 200..=299.
    #[error("could not reach {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response could not be written to disk.
    #[error("could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors while loading the feed document.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("could not read cached feed {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Neither the RSS nor the Atom parser accepted the document.
    #[error("not an RSS or Atom feed (rss: {rss}; atom: {atom})")]
    Parse { rss: String, atom: String },
}

/// Local filesystem failures outside of a fetch.
#[derive(Debug, Error)]
pub enum FileSystemError {
    #[error("could not create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The worker pool could not account for every job.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("a download worker panicked")]
    WorkerPanicked,
}

/// Invalid or missing command-line configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No feed provided.")]
    MissingFeed,
}
