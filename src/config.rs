//! Command-line arguments and the settings derived from them.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::cache::DEFAULT_MAX_AGE;
use crate::dispatch::{DEFAULT_COOLDOWN, DEFAULT_WORKERS};
use crate::error::ConfigError;

const APP_DIR: &str = "snarf";

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Download the media enclosures of an RSS or Atom feed.
///
/// Files land in `<destination>/<feed title>/<item title>.<ext>`; items whose
/// file already exists are skipped, so re-running only fetches new episodes.
#[derive(Parser, Debug)]
#[command(name = "snarf")]
#[command(author, version, about)]
pub struct Args {
    /// The RSS/Atom feed to inspect
    #[arg(short = 'f', long = "feed", value_name = "URL")]
    pub feed: Option<String>,

    /// The destination directory [default: ~/.config/snarf]
    #[arg(short = 'd', long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Number of concurrent download workers (1-64)
    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS as u8, value_parser = clap::value_parser!(u8).range(1..=64))]
    pub workers: u8,

    /// Seconds a worker rests after each completed download
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_COOLDOWN.as_secs())]
    pub cooldown: u64,

    /// Re-fetch the cached feed once it is older than this many days
    #[arg(long, value_name = "DAYS", default_value_t = DEFAULT_MAX_AGE.as_secs() / SECS_PER_DAY)]
    pub max_age_days: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Fully resolved run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub feed_url: String,
    pub destination: PathBuf,
    pub workers: usize,
    pub cooldown: Duration,
    pub max_age: Duration,
}

impl Settings {
    /// Fails only when no feed URL was given; everything else has a default.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let feed_url = args
            .feed
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .ok_or(ConfigError::MissingFeed)?
            .to_string();

        Ok(Self {
            feed_url,
            destination: args.destination.clone().unwrap_or_else(default_destination),
            workers: usize::from(args.workers),
            cooldown: Duration::from_secs(args.cooldown),
            max_age: Duration::from_secs(args.max_age_days.saturating_mul(SECS_PER_DAY)),
        })
    }
}

/// `~/.config/snarf` on every platform, or `./snarf` without a home directory.
///
/// The same path on macOS, where [`dirs::config_dir`] would point at
/// `~/Library/Application Support` instead.
pub fn default_destination() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".config").join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(argv: &[&str]) -> Result<Settings, ConfigError> {
        let args = Args::try_parse_from(argv).unwrap();
        Settings::from_args(&args)
    }

    #[test]
    fn defaults() {
        let s = settings(&["snarf", "-f", "https://example.com/feed.xml"]).unwrap();

        assert_eq!(s.feed_url, "https://example.com/feed.xml");
        assert_eq!(s.destination, default_destination());
        assert_eq!(s.workers, 5);
        assert_eq!(s.cooldown, Duration::from_secs(5));
        assert_eq!(s.max_age, Duration::from_secs(7 * 24 * 60 * 60));
    }

    #[test]
    fn default_destination_is_dot_config_under_home() {
        let expected = match dirs::home_dir() {
            Some(home) => home.join(".config").join("snarf"),
            None => PathBuf::from("snarf"),
        };

        assert_eq!(default_destination(), expected);
        assert!(default_destination().ends_with(".config/snarf") || dirs::home_dir().is_none());
    }

    #[test]
    fn missing_feed_is_a_config_error() {
        assert!(matches!(settings(&["snarf"]), Err(ConfigError::MissingFeed)));
        assert!(matches!(settings(&["snarf", "-f", "  "]), Err(ConfigError::MissingFeed)));
    }

    #[test]
    fn long_flags() {
        let s = settings(&[
            "snarf",
            "--feed",
            "https://example.com/feed.xml",
            "--destination",
            "/tmp/pods",
            "--workers",
            "2",
            "--cooldown",
            "0",
            "--max-age-days",
            "1",
        ])
        .unwrap();

        assert_eq!(s.destination, PathBuf::from("/tmp/pods"));
        assert_eq!(s.workers, 2);
        assert_eq!(s.cooldown, Duration::ZERO);
        assert_eq!(s.max_age, Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn workers_out_of_range_is_rejected() {
        assert!(Args::try_parse_from(["snarf", "-w", "0"]).is_err());
        assert!(Args::try_parse_from(["snarf", "-w", "65"]).is_err());
    }

    #[test]
    fn verbosity_maps_to_log_level() {
        assert_eq!(Args::try_parse_from(["snarf"]).unwrap().log_level(), "info");
        assert_eq!(Args::try_parse_from(["snarf", "-v"]).unwrap().log_level(), "debug");
        assert_eq!(Args::try_parse_from(["snarf", "-vv"]).unwrap().log_level(), "trace");
        assert_eq!(Args::try_parse_from(["snarf", "-q", "-v"]).unwrap().log_level(), "error");
    }
}
