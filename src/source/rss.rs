//! RSS 2.0 documents, via the [`rss`] crate.

use super::{Feed, Item};

/// Convert an already-parsed [`rss::Channel`] into a [`Feed`].
///
/// RSS allows at most one `<enclosure>` per item.
pub fn from_channel(channel: &rss::Channel) -> Feed {
    let items = channel
        .items()
        .iter()
        .map(|entry| {
            let item = Item::new(entry.title().unwrap_or_default());
            match entry.enclosure() {
                Some(enc) => item.with_enclosure(enc.url()),
                None => item,
            }
        })
        .collect();

    Feed {
        title: channel.title().to_string(),
        items,
    }
}

pub fn parse(bytes: &[u8]) -> Result<Feed, rss::Error> {
    let channel = rss::Channel::read_from(bytes)?;
    Ok(from_channel(&channel))
}
