use std::{cell::RefCell, rc::Rc};

use crate::{
    book::Book,
    catalog::{AvailabilityChange, Catalog, CatalogStats},
    events::CatalogEvent,
    observers::CatalogObserver,
};

/// Collects events so tests can inspect them
#[derive(Debug, Default, Clone)]
struct Recorder {
    /// Events seen so far, shared with the test body
    events: Rc<RefCell<Vec<CatalogEvent>>>,
}

impl CatalogObserver for Recorder {
    fn on_event(&self, event: &CatalogEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[allow(clippy::unwrap_used)]
fn book(isbn: &str, title: &str) -> Book {
    Book::new(isbn, title, "Test Author", 2001).unwrap()
}

/// Helper function to set up a small catalog with a recorder attached
fn setup_catalog() -> (Catalog, Rc<RefCell<Vec<CatalogEvent>>>) {
    let recorder = Recorder::default();
    let events = Rc::clone(&recorder.events);
    let mut catalog = Catalog::new();
    catalog.register_observer(Box::new(recorder));

    catalog.insert(book("978-0-1", "Iracema"));
    catalog.insert(book("978-0-5", "O Cortico"));
    catalog.insert(book("978-0-3", "Senhora"));
    events.borrow_mut().clear();

    (catalog, events)
}

#[test]
fn test_listing_is_sorted() {
    let (catalog, _) = setup_catalog();
    let isbns: Vec<&str> = catalog.books().map(Book::isbn).collect();
    assert_eq!(isbns, ["978-0-1", "978-0-3", "978-0-5"]);
    assert_eq!(catalog.height(), 2);
}

#[test]
fn test_lend_then_lend_again() {
    let (mut catalog, events) = setup_catalog();

    assert_eq!(catalog.set_availability("978-0-1", false), AvailabilityChange::Changed);
    assert_eq!(catalog.set_availability("978-0-1", false), AvailabilityChange::Unchanged);
    assert!(!catalog.get("978-0-1").is_some_and(Book::is_available));

    // only the real change is announced
    assert_eq!(
        *events.borrow(),
        [CatalogEvent::AvailabilityChanged {
            isbn: "978-0-1".to_string(),
            title: "Iracema".to_string(),
            available: false,
        }]
    );
}

#[test]
fn test_give_back() {
    let (mut catalog, _) = setup_catalog();
    assert_eq!(catalog.give_back("978-0-3"), AvailabilityChange::Unchanged);
    assert_eq!(catalog.lend("978-0-3"), AvailabilityChange::Changed);
    assert_eq!(catalog.give_back("978-0-3"), AvailabilityChange::Changed);
    assert!(catalog.get("978-0-3").is_some_and(Book::is_available));
}

#[test]
fn test_unknown_isbn_not_found() {
    let (mut catalog, events) = setup_catalog();
    assert_eq!(catalog.lend("000"), AvailabilityChange::NotFound);
    assert_eq!(catalog.get("000"), None);
    assert_eq!(catalog.remove("000"), None);
    assert_eq!(catalog.count(), 3);
    assert!(events.borrow().is_empty());
}

#[test]
fn test_duplicate_insert_is_ignored() {
    let (mut catalog, events) = setup_catalog();
    catalog.lend("978-0-5");

    assert!(!catalog.insert(book("978-0-5", "Another Title")));
    assert_eq!(catalog.count(), 3);
    let kept = catalog.get("978-0-5");
    assert_eq!(kept.map(Book::title), Some("O Cortico"));
    assert_eq!(kept.map(Book::is_available), Some(false));
    assert_eq!(
        events.borrow().last(),
        Some(&CatalogEvent::DuplicateIgnored { isbn: "978-0-5".to_string() })
    );
}

#[test]
fn test_available_listing_and_stats() {
    let (mut catalog, _) = setup_catalog();
    catalog.lend("978-0-3");

    let on_shelf: Vec<&str> = catalog.available_books().map(Book::isbn).collect();
    assert_eq!(on_shelf, ["978-0-1", "978-0-5"]);
    assert_eq!(catalog.stats(), CatalogStats { total: 3, available: 2, height: 2 });
}

#[test]
fn test_remove_root_with_two_children() {
    let (mut catalog, events) = setup_catalog();

    let removed = catalog.remove("978-0-3");
    assert_eq!(removed.as_ref().map(Book::title), Some("Senhora"));
    assert_eq!(catalog.count(), 2);
    assert_eq!(catalog.tree().root_key(), Some("978-0-5"));
    assert!(catalog.verify().is_ok());
    assert_eq!(events.borrow().first().map(CatalogEvent::isbn), Some("978-0-3"));
}

#[test]
fn test_traverse_by_author() {
    let mut catalog = Catalog::new();
    for (isbn, author) in [("1", "Amado"), ("2", "Lispector"), ("3", "Amado")] {
        if let Ok(book) = Book::new(isbn, "t", author, 1950) {
            catalog.insert(book);
        }
    }
    let amado: Vec<&str> = catalog.traverse(|b| b.author() == "Amado").map(Book::isbn).collect();
    assert_eq!(amado, ["1", "3"]);
}
