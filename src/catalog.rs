use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    book::Book,
    error::TreeError,
    events::CatalogEvent,
    observers::{CatalogObserver, EventLogger, LoanNotifier},
    tree::{AvlTree, Iter},
};

/// Result of asking for a book to be made available or unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityChange {
    /// No book has that ISBN
    NotFound,
    /// The book was already in the requested state
    Unchanged,
    /// The flag was flipped
    Changed,
}

/// Summary figures for the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogStats {
    /// Books in the catalog
    pub total: usize,
    /// Books currently on the shelf
    pub available: usize,
    /// Height of the underlying tree
    pub height: u32,
}

/// A library's book inventory, ordered by ISBN
pub struct Catalog {
    /// Books keyed by ISBN
    books: AvlTree<Book>,
    /// Registered change observers
    observers: Vec<Box<dyn CatalogObserver>>,
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("books", &self.books)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create an empty catalog without observers
    #[must_use]
    pub fn new() -> Self {
        Self { books: AvlTree::new(), observers: Vec::new() }
    }

    /// Create an empty catalog with the standard logging observers attached
    #[must_use]
    pub fn with_standard_observers() -> Self {
        let mut catalog = Self::new();
        catalog.register_observer(Box::new(EventLogger));
        catalog.register_observer(Box::new(LoanNotifier));
        catalog
    }

    /// Register an observer to be notified of catalog changes
    pub fn register_observer(&mut self, observer: Box<dyn CatalogObserver>) {
        self.observers.push(observer);
    }

    /// Add a book.
    ///
    /// A book whose ISBN is already catalogued is discarded and the stored one
    /// kept as is; the return value tells the two cases apart.
    pub fn insert(&mut self, book: Book) -> bool {
        let isbn = book.isbn().to_owned();
        let inserted = self.books.insert(book);
        let event = if inserted {
            CatalogEvent::Inserted { isbn }
        } else {
            CatalogEvent::DuplicateIgnored { isbn }
        };
        self.notify(&event);
        inserted
    }

    /// Remove a book, returning it. Unknown ISBNs are ignored.
    pub fn remove(&mut self, isbn: &str) -> Option<Book> {
        let removed = self.books.remove(isbn);
        if let Some(book) = &removed {
            self.notify(&CatalogEvent::Removed {
                isbn: book.isbn().to_owned(),
                title: book.title().to_owned(),
            });
        } else {
            debug!(isbn, "remove of unknown ISBN ignored");
        }
        removed
    }

    /// Look up a book by ISBN
    #[must_use]
    pub fn get(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// Set a book's availability flag
    pub fn set_availability(&mut self, isbn: &str, available: bool) -> AvailabilityChange {
        let Some(book) = self.books.get_mut(isbn) else {
            return AvailabilityChange::NotFound;
        };
        if book.is_available() == available {
            return AvailabilityChange::Unchanged;
        }

        book.set_available(available);
        let event = CatalogEvent::AvailabilityChanged {
            isbn: book.isbn().to_owned(),
            title: book.title().to_owned(),
            available,
        };
        self.notify(&event);
        AvailabilityChange::Changed
    }

    /// Lend a book out
    pub fn lend(&mut self, isbn: &str) -> AvailabilityChange {
        self.set_availability(isbn, false)
    }

    /// Take a lent book back
    pub fn give_back(&mut self, isbn: &str) -> AvailabilityChange {
        self.set_availability(isbn, true)
    }

    /// All books in ascending ISBN order
    #[must_use]
    pub fn books(&self) -> Iter<'_, Book> {
        self.books.iter()
    }

    /// Books on the shelf, in ascending ISBN order
    pub fn available_books(&self) -> impl Iterator<Item = &Book> {
        self.books.traverse(Book::is_available)
    }

    /// Books matching `predicate`, in ascending ISBN order
    pub fn traverse<P>(&self, predicate: P) -> impl Iterator<Item = &Book>
    where
        P: FnMut(&Book) -> bool,
    {
        self.books.traverse(predicate)
    }

    /// Number of books
    #[must_use]
    pub fn count(&self) -> usize {
        self.books.count()
    }

    /// Height of the underlying tree
    #[must_use]
    pub fn height(&self) -> u32 {
        self.books.height()
    }

    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total: self.count(),
            available: self.available_books().count(),
            height: self.height(),
        }
    }

    /// The tree the books are stored in
    #[must_use]
    pub fn tree(&self) -> &AvlTree<Book> {
        &self.books
    }

    /// Check the tree invariants
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn verify(&self) -> Result<(), TreeError> {
        self.books.verify()
    }

    /// Tell every observer about `event`
    fn notify(&self, event: &CatalogEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

#[cfg(test)]
mod tests;
