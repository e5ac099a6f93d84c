//! Line-oriented command layer on top of [`Catalog`].
//!
//! Parsing turns one input line into a [`Command`]; [`execute`] applies it and
//! returns a [`Response`] as plain data, leaving presentation to the caller.

use std::str::FromStr;

use serde::Serialize;

use crate::{
    book::{Book, MAX_AUTHOR_LEN, MAX_ISBN_LEN, MAX_TITLE_LEN},
    catalog::{AvailabilityChange, Catalog, CatalogStats},
    error::CommandError,
    visualization::TreeVisualization,
};

/// Usage text shown by `help`
pub const HELP: &str = "\
add ISBN | TITLE | AUTHOR | YEAR   catalogue a book
remove ISBN                        remove a book
find ISBN                          look a book up
list                               all books, by ISBN
available                          books on the shelf, by ISBN
lend ISBN                          lend a book out
return ISBN                        take a book back
stats                              totals and tree height
tree                               print the tree sideways
dot                                print the tree as a DOT graph
check                              verify the tree invariants
help                               this text
quit                               leave";

/// One parsed catalog command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Catalogue a new book
    Add {
        /// Catalog key
        isbn: String,
        /// Book title
        title: String,
        /// Book author
        author: String,
        /// Publication year
        year: i32,
    },
    /// Remove by ISBN
    Remove(String),
    /// Look up by ISBN
    Find(String),
    /// All books
    List,
    /// Books on the shelf
    Available,
    /// Lend by ISBN
    Lend(String),
    /// Return by ISBN
    Return(String),
    /// Totals and height
    Stats,
    /// Sideways text rendering of the tree
    Tree,
    /// DOT rendering of the tree
    Dot,
    /// Invariant check
    Check,
    /// Usage text
    Help,
    /// Leave the loop
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']).trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        match verb.to_ascii_lowercase().as_str() {
            "add" | "insert" => parse_add(verb, rest),
            "remove" | "delete" => isbn_argument(verb, rest).map(Self::Remove),
            "find" | "lookup" => isbn_argument(verb, rest).map(Self::Find),
            "list" | "ls" => Ok(Self::List),
            "available" => Ok(Self::Available),
            "lend" | "borrow" => isbn_argument(verb, rest).map(Self::Lend),
            "return" => isbn_argument(verb, rest).map(Self::Return),
            "stats" => Ok(Self::Stats),
            "tree" => Ok(Self::Tree),
            "dot" => Ok(Self::Dot),
            "check" => Ok(Self::Check),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(CommandError::UnknownCommand(verb.to_owned())),
        }
    }
}

/// Parse `ISBN | TITLE | AUTHOR | YEAR`
fn parse_add(verb: &str, rest: &str) -> Result<Command, CommandError> {
    let mut fields = rest.split('|').map(str::trim);
    let mut next = |argument: &'static str| {
        fields.next().filter(|field| !field.is_empty()).ok_or_else(|| {
            CommandError::MissingArgument { command: verb.to_owned(), argument }
        })
    };

    let isbn = next("an ISBN")?;
    let title = next("a title")?;
    let author = next("an author")?;
    let year = next("a publication year")?;
    let year = year.parse::<i32>().map_err(|_| CommandError::InvalidYear(year.to_owned()))?;

    Ok(Command::Add {
        isbn: bounded(isbn, MAX_ISBN_LEN).to_owned(),
        title: bounded(title, MAX_TITLE_LEN).to_owned(),
        author: bounded(author, MAX_AUTHOR_LEN).to_owned(),
        year,
    })
}

/// The single ISBN argument of `verb`
fn isbn_argument(verb: &str, rest: &str) -> Result<String, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument { command: verb.to_owned(), argument: "an ISBN" });
    }
    Ok(bounded(rest, MAX_ISBN_LEN).to_owned())
}

/// Longest prefix of `input` that fits in `max` bytes without splitting a
/// character
#[must_use]
#[allow(clippy::arithmetic_side_effects)]
pub fn bounded(input: &str, max: usize) -> &str {
    let end = input
        .char_indices()
        .map(|(start, c)| start + c.len_utf8())
        .take_while(|&end| end <= max)
        .last()
        .unwrap_or(0);
    input.get(..end).unwrap_or_default()
}

/// Outcome of one executed command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    /// A new book was catalogued
    Inserted {
        /// The new book
        book: Book,
    },
    /// The ISBN was already catalogued; nothing changed
    Duplicate {
        /// The book that was kept
        book: Book,
    },
    /// Result of `remove`
    Removed {
        /// ISBN asked for
        isbn: String,
        /// The removed book, if there was one
        book: Option<Book>,
    },
    /// Result of `find`
    Found {
        /// ISBN asked for
        isbn: String,
        /// The matching book, if any
        book: Option<Book>,
    },
    /// Result of `list` or `available`
    Listing {
        /// Whether only available books were listed
        available_only: bool,
        /// Books in ascending ISBN order
        books: Vec<Book>,
    },
    /// Result of `lend` or `return`
    Availability {
        /// ISBN asked for
        isbn: String,
        /// Requested state: `false` for a loan, `true` for a return
        available: bool,
        /// What happened
        outcome: AvailabilityChange,
        /// Title of the book, when found
        title: Option<String>,
    },
    /// Result of `stats`
    Stats(CatalogStats),
    /// Result of `tree` or `dot`
    Diagram {
        /// Rendered tree
        text: String,
    },
    /// Result of `check`
    Verified {
        /// First violated invariant, if any
        violation: Option<String>,
    },
    /// Usage text
    Help {
        /// Command summary
        text: &'static str,
    },
    /// The caller should stop reading commands
    Quit,
}

/// Apply `command` to `catalog`
///
/// # Errors
///
/// Returns `CommandError::Catalog` if an `add` carries an ISBN the catalog
/// rejects.
pub fn execute(catalog: &mut Catalog, command: Command) -> Result<Response, CommandError> {
    let response = match command {
        Command::Add { isbn, title, author, year } => {
            let book = Book::new(isbn, title, author, year)?;
            let isbn = book.isbn().to_owned();
            if catalog.insert(book.clone()) {
                Response::Inserted { book }
            } else {
                let kept = catalog.get(&isbn).cloned().unwrap_or(book);
                Response::Duplicate { book: kept }
            }
        }
        Command::Remove(isbn) => {
            let book = catalog.remove(&isbn);
            Response::Removed { isbn, book }
        }
        Command::Find(isbn) => {
            let book = catalog.get(&isbn).cloned();
            Response::Found { isbn, book }
        }
        Command::List => {
            Response::Listing { available_only: false, books: catalog.books().cloned().collect() }
        }
        Command::Available => Response::Listing {
            available_only: true,
            books: catalog.available_books().cloned().collect(),
        },
        Command::Lend(isbn) => availability(catalog, isbn, false),
        Command::Return(isbn) => availability(catalog, isbn, true),
        Command::Stats => Response::Stats(catalog.stats()),
        Command::Tree => Response::Diagram { text: TreeVisualization::render_text(catalog.tree()) },
        Command::Dot => Response::Diagram { text: TreeVisualization::generate_dot(catalog.tree()) },
        Command::Check => {
            Response::Verified { violation: catalog.verify().err().map(|e| e.to_string()) }
        }
        Command::Help => Response::Help { text: HELP },
        Command::Quit => Response::Quit,
    };
    Ok(response)
}

/// Run a loan or return and describe it
fn availability(catalog: &mut Catalog, isbn: String, available: bool) -> Response {
    let outcome = catalog.set_availability(&isbn, available);
    let title = catalog.get(&isbn).map(|book| book.title().to_owned());
    Response::Availability { isbn, available, outcome, title }
}
