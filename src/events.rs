use serde::{Deserialize, Serialize};

/// Something that happened to the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CatalogEvent {
    /// A new book was added
    Inserted {
        /// Key of the new book
        isbn: String,
    },
    /// An insert hit an existing ISBN; the stored book was kept
    DuplicateIgnored {
        /// Key that was already present
        isbn: String,
    },
    /// A book was taken out of the catalog
    Removed {
        /// Key of the removed book
        isbn: String,
        /// Its title, for log readability
        title: String,
    },
    /// A book was lent (`available == false`) or returned
    AvailabilityChanged {
        /// Key of the book
        isbn: String,
        /// Its title
        title: String,
        /// New availability
        available: bool,
    },
}

impl CatalogEvent {
    /// ISBN the event refers to
    #[must_use]
    pub fn isbn(&self) -> &str {
        match self {
            Self::Inserted { isbn }
            | Self::DuplicateIgnored { isbn }
            | Self::Removed { isbn, .. }
            | Self::AvailabilityChanged { isbn, .. } => isbn,
        }
    }
}
