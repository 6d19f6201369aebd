//! Turning a parsed feed into download jobs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::source::{Feed, Item};
use crate::store::{child_name, slug};

/// "Consider downloading this item's first enclosure."
///
/// Moved into the dispatcher's queue and consumed by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Index of the item in feed order.
    pub id: usize,
    pub item: Item,
    /// Directory the media is saved into, shared by every job of a run.
    pub destination: PathBuf,
}

/// Build one job per item, oldest first.
///
/// Feeds list newest items first, so the jobs come out in reverse document
/// order. Every job points at `<root>/<slug(feed title)>`, which is always a
/// direct child of `root` whatever the title contains.
pub fn build_jobs(feed: &Feed, root: &Path) -> Vec<Job> {
    let destination = root.join(child_name(&feed.title));

    feed.items
        .iter()
        .enumerate()
        .rev()
        .map(|(id, item)| Job {
            id,
            item: item.clone(),
            destination: destination.clone(),
        })
        .collect()
}

/// Groups of distinct item titles that map to the same file name.
///
/// Keyed by slug; each group lists the colliding titles in feed order.
/// Only items with an enclosure are considered since the others never
/// write anything.
pub fn slug_collisions(feed: &Feed) -> Vec<(String, Vec<String>)> {
    let mut by_slug: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for item in feed.items.iter().filter(|i| i.primary_enclosure().is_some()) {
        let titles = by_slug.entry(slug(&item.title)).or_default();
        if !titles.contains(&item.title) {
            titles.push(item.title.clone());
        }
    }

    by_slug.into_iter().filter(|(_, titles)| titles.len() > 1).collect()
}
