//! snarf — download the media enclosures of an RSS/Atom feed.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐ path ┌───────────┐ Feed ┌────────┐ Vec<Job> ┌─────────────┐
//! │ cache.rs │ ───► │ source/   │ ───► │ job.rs │ ───────► │ dispatch.rs │
//! │ (TTL)    │      │ (rss/atom)│      │        │          │ (N workers) │
//! └──────────┘      └───────────┘      └────────┘          └─────────────┘
//!       │                                                         │ decide()
//!       ▼                                                         ▼
//! ┌──────────┐                                             ┌─────────────┐
//! │ fetch.rs │ ◄────────────────────────────────────────── │ decide.rs   │
//! └──────────┘                                             └─────────────┘
//! ```
//!
//! * **`cache`** — keeps a copy of the feed document, refreshed after 7 days.
//! * **`source/`** — reads the cached document and parses RSS or Atom.
//! * **`job`** — one job per item, oldest first.
//! * **`dispatch`** — fixed worker pool over a shared queue, with a
//!   per-worker cooldown after each download.
//! * **`decide`** — per item: skip, download, or report a failure.
//! * **`fetch`** / **`store`** — network and filesystem primitives.
//! * **`app`** — runs the pipeline; **`main`** parses arguments, sets up
//!   logging and prints results.

mod app;
mod cache;
mod config;
mod decide;
mod dispatch;
mod error;
mod fetch;
mod job;
mod source;
mod store;

use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use app::{App, Summary};
use config::{Args, Settings};
use fetch::HttpFetcher;

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logs go to stderr so stdout carries only the result lines.
/// `RUST_LOG` takes priority over `-v` / `-q`.
fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let start = Instant::now();

    // Parse before tracing so --help works without logs.
    let args = Args::parse();
    init_tracing(&args);
    debug!(?args, "arguments parsed");

    let settings = match Settings::from_args(&args) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let fetcher = HttpFetcher::new().context("building HTTP client")?;

    let results = App::new(settings).run(&fetcher, |result| {
        if result.important {
            println!("{}", result.message);
        }
    })?;

    let summary = Summary::from_results(&results);
    println!("Took {:.2?} ({} items)", start.elapsed(), summary.total());

    Ok(ExitCode::SUCCESS)
}
