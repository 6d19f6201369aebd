//! Atom documents, via [`atom_syndication`].

use super::{Feed, Item};

pub fn from_feed(feed: &atom_syndication::Feed) -> Feed {
    let items = feed
        .entries()
        .iter()
        .map(|entry| {
            // Atom marks attachments as `<link rel="enclosure">`.
            entry
                .links()
                .iter()
                .filter(|link| link.rel() == "enclosure")
                .fold(Item::new(entry.title().as_str()), |item, link| {
                    item.with_enclosure(link.href())
                })
        })
        .collect();

    Feed {
        title: feed.title().as_str().to_string(),
        items,
    }
}

pub fn parse(bytes: &[u8]) -> Result<Feed, atom_syndication::Error> {
    let feed = atom_syndication::Feed::read_from(bytes)?;
    Ok(from_feed(&feed))
}
