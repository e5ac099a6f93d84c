use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::CatalogError, tree::Keyed};

/// Longest ISBN the catalog stores, in bytes
pub const MAX_ISBN_LEN: usize = 13;
/// Longest title the command layer passes through, in bytes
pub const MAX_TITLE_LEN: usize = 99;
/// Longest author name the command layer passes through, in bytes
pub const MAX_AUTHOR_LEN: usize = 49;

/// A book in the library's inventory, keyed by ISBN
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Book {
    /// Unique catalog key
    isbn: String,
    /// Title as entered
    title: String,
    /// Author as entered
    author: String,
    /// Year of publication
    year: i32,
    /// Whether the book is on the shelf (not lent out)
    available: bool,
}

impl Book {
    /// Create a new, available book.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidIsbn` if `isbn` is empty or longer than
    /// [`MAX_ISBN_LEN`] bytes.
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
    ) -> Result<Self, CatalogError> {
        let isbn = isbn.into();
        if isbn.is_empty() {
            return Err(CatalogError::InvalidIsbn { isbn, reason: "ISBN must not be empty" });
        }
        if isbn.len() > MAX_ISBN_LEN {
            return Err(CatalogError::InvalidIsbn { isbn, reason: "ISBN is longer than 13 bytes" });
        }

        Ok(Self { isbn, title: title.into(), author: author.into(), year, available: true })
    }

    /// Catalog key
    #[must_use]
    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Year of publication
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Whether the book can be lent
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Update the availability flag
    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// One-line summary of the book's loan status
    #[must_use]
    pub fn get_description(&self) -> String {
        if self.available {
            format!("\"{}\" is available for loan", self.title)
        } else {
            format!("\"{}\" is on loan", self.title)
        }
    }
}

impl Keyed for Book {
    fn key(&self) -> &str {
        &self.isbn
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({}, {})", self.isbn, self.title, self.author, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_book_is_available() {
        let book = Book::new("978-0-1", "Dom Casmurro", "Machado de Assis", 1899);
        assert!(matches!(book, Ok(ref b) if b.is_available() && b.key() == "978-0-1"));
    }

    #[test]
    fn test_isbn_bounds() {
        assert!(matches!(
            Book::new("", "t", "a", 2000),
            Err(CatalogError::InvalidIsbn { reason: "ISBN must not be empty", .. })
        ));
        assert!(Book::new("978-85-359-999", "t", "a", 2000).is_err());
        assert!(Book::new("978-85-359-99", "t", "a", 2000).is_ok());
    }

    #[test]
    fn test_display() {
        let book = Book::new("978-0-1", "Vidas Secas", "Graciliano Ramos", 1938);
        assert_eq!(
            book.map(|b| b.to_string()),
            Ok("978-0-1 - Vidas Secas (Graciliano Ramos, 1938)".to_string())
        );
    }
}
