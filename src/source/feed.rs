//! The parsed feed shared by every format.
//!
//! RSS and Atom documents are both normalised into a [`Feed`] so that job
//! building never needs to know which format the document was in.

/// A parsed feed. Never persisted; rebuilt from the cached document each run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    /// Feed title, used to name the destination directory.
    pub title: String,

    /// Items in document order.
    pub items: Vec<Item>,
}

/// One feed entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    /// Item title, used to name the downloaded file. Empty if the feed
    /// did not provide one.
    pub title: String,

    /// Media attachments in document order. Only the first one is ever
    /// downloaded.
    pub enclosures: Vec<Enclosure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
}

impl Item {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            enclosures: Vec::new(),
        }
    }

    pub fn with_enclosure(mut self, url: impl Into<String>) -> Self {
        self.enclosures.push(Enclosure { url: url.into() });
        self
    }

    /// The enclosure that gets downloaded, if any.
    pub fn primary_enclosure(&self) -> Option<&Enclosure> {
        self.enclosures.first()
    }
}
