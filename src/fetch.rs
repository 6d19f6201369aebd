//! Blocking "URL into file" retrieval.
//!
//! Everything that touches the network goes through the [`Fetcher`] trait so
//! the cache and the workers can be exercised without a server.

use std::fs::{self, File};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::FetchError;

/// Retrieve the body at `url` and write it to `dest`.
///
/// Workers share one fetcher across threads, hence `Send + Sync`.
pub trait Fetcher: Send + Sync {
    /// Fails on transport errors and on any status outside 200..=299.
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

/// [`Fetcher`] backed by a [`reqwest::blocking::Client`].
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> reqwest::Result<Self> {
        // No timeout: a stalled download blocks its worker until the peer gives up.
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(None)
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Use a preconfigured client (proxy, TLS, headers) as is.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let network = |source: reqwest::Error| FetchError::Network {
            url: url.to_string(),
            source,
        };

        let mut response = self.client.get(url).send().map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut file = File::create(dest).map_err(|source| FetchError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
        let bytes = match response.copy_to(&mut file) {
            Ok(bytes) => bytes,
            Err(e) => {
                // A truncated file would pass for "already downloaded" next run.
                drop(file);
                if let Err(rm) = fs::remove_file(dest) {
                    warn!(path = %dest.display(), error = %rm, "could not remove partial download");
                }
                return Err(network(e));
            }
        };

        debug!(url, path = %dest.display(), bytes, "fetched");
        Ok(())
    }
}

/// In-memory [`Fetcher`] for tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;

    use super::Fetcher;
    use crate::error::FetchError;

    /// Serves canned bodies; unknown URLs answer 404.
    #[derive(Default)]
    pub struct FakeFetcher {
        bodies: HashMap<String, Vec<u8>>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn serve(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.bodies.insert(url.to_string(), body.into());
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls_to(&self, url: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
        }
    }

    impl Fetcher for FakeFetcher {
        fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
            self.calls.lock().unwrap().push(url.to_string());
            match self.bodies.get(url) {
                Some(body) => fs::write(dest, body).map_err(|source| FetchError::Io {
                    path: dest.to_path_buf(),
                    source,
                }),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }
}
