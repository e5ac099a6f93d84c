//! Error types for the catalog and its command layer

use thiserror::Error;

/// A structural invariant of the balanced tree that does not hold
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A key sits on the wrong side of one of its ancestors
    #[error("key {key:?} is out of order with respect to its ancestors")]
    Unordered {
        /// Offending key
        key: String,
    },

    /// Subtree heights differ by more than one
    #[error("node {key:?} is unbalanced (balance factor {factor})")]
    Unbalanced {
        /// Key of the unbalanced node
        key: String,
        /// height(left) - height(right)
        factor: i64,
    },

    /// Cached height disagrees with the children
    #[error("node {key:?} caches height {cached} but its subtree has height {actual}")]
    StaleHeight {
        /// Key of the node with the stale height
        key: String,
        /// Height stored in the node
        cached: u32,
        /// Height recomputed from the children
        actual: u32,
    },
}

/// Errors raised while building catalog records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The ISBN is empty or longer than the catalog accepts
    #[error("invalid ISBN {isbn:?}: {reason}")]
    InvalidIsbn {
        /// ISBN as supplied
        isbn: String,
        /// Why it was rejected
        reason: &'static str,
    },
}

/// Errors raised while parsing or executing a catalog command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Blank input line
    #[error("empty command")]
    Empty,

    /// Verb not recognised
    #[error("unknown command {0:?} (try `help`)")]
    UnknownCommand(String),

    /// A required argument was not supplied
    #[error("`{command}` needs {argument}")]
    MissingArgument {
        /// Command verb as typed
        command: String,
        /// Name of the missing argument
        argument: &'static str,
    },

    /// Publication year is not an integer
    #[error("invalid publication year {0:?}")]
    InvalidYear(String),

    /// The record could not be built
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
