//! Book catalog for a library, backed by an AVL-balanced search tree.
//!
//! The [`tree`] module holds the generic balanced tree engine; [`Catalog`]
//! stores [`Book`] records in it keyed by ISBN and adds loan handling, and
//! [`command`] is a small line-oriented front end for interactive use.

pub mod book;
pub mod catalog;
pub mod command;
pub mod error;
pub mod events;
pub mod observers;
pub mod tree;
pub mod visualization;

pub use book::Book;
pub use catalog::{AvailabilityChange, Catalog, CatalogStats};
pub use command::{Command, Response};
pub use error::{CatalogError, CommandError, TreeError};
pub use events::CatalogEvent;
pub use observers::CatalogObserver;
pub use tree::{AvlTree, Keyed};
pub use visualization::TreeVisualization;
