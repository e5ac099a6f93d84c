use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
    process::ExitCode,
};

use book_catalog::{
    AvailabilityChange, Catalog, Command, CommandError, Response, command::execute,
};
use clap::Parser;
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the catalog shell
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log catalog and tree events (rotations, loans) to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print each response as one JSON object per line
    #[arg(long)]
    json: bool,

    /// Read commands from a file instead of standard input
    #[arg(short, long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Do not print the banner and prompt
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.no_color || args.json {
        colored::control::set_override(false);
    }

    let result = match &args.script {
        Some(path) => File::open(path).and_then(|file| run(BufReader::new(file), &args, false)),
        None => run(io::stdin().lock(), &args, !args.quiet && !args.json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr subscriber; `RUST_LOG` overrides the verbosity flag
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// Read and execute commands until end of input or `quit`
fn run<B: BufRead>(input: B, args: &Args, interactive: bool) -> io::Result<()> {
    let mut catalog = Catalog::with_standard_observers();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if interactive {
        writeln!(out, "{}", "Library catalog".green().bold())?;
        writeln!(out, "Type `help` for the list of commands.\n")?;
    }

    let mut lines = input.lines();
    loop {
        if interactive {
            write!(out, "{}", "catalog> ".cyan())?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let outcome = line.parse::<Command>().and_then(|command| execute(&mut catalog, command));
        match outcome {
            Ok(Response::Quit) => break,
            Ok(response) if args.json => {
                serde_json::to_writer(&mut out, &response)?;
                writeln!(out)?;
            }
            Ok(response) => render(&mut out, &response)?,
            Err(CommandError::Empty) => {}
            Err(error) if args.json => {
                let message = serde_json::json!({ "kind": "error", "message": error.to_string() });
                serde_json::to_writer(&mut out, &message)?;
                writeln!(out)?;
            }
            Err(error) => writeln!(out, "{} {error}", "error:".red().bold())?,
        }
    }

    debug!(books = catalog.count(), "catalog session finished");
    Ok(())
}

/// Human-readable output for one response
fn render<W: Write>(out: &mut W, response: &Response) -> io::Result<()> {
    match response {
        Response::Inserted { book } => {
            writeln!(out, "{} {book}", "Book added:".green())
        }
        Response::Duplicate { book } => writeln!(
            out,
            "{} {} is already catalogued as \"{}\"; kept the existing entry",
            "Skipped:".yellow(),
            book.isbn(),
            book.title()
        ),
        Response::Removed { book: Some(book), .. } => {
            writeln!(out, "{} {book}", "Book removed:".green())
        }
        Response::Removed { isbn, book: None } => {
            writeln!(out, "{} no book with ISBN {isbn}; nothing removed", "Note:".yellow())
        }
        Response::Found { book: Some(book), .. } => {
            writeln!(out, "{} {book}", "Found:".green())?;
            writeln!(out, "       {}", book.get_description())
        }
        Response::Found { isbn, book: None } => {
            writeln!(out, "{} no book with ISBN {isbn}", "Not found:".red())
        }
        Response::Listing { available_only, books } => {
            let heading = if *available_only { "Available books:" } else { "Catalogued books:" };
            writeln!(out, "{}", heading.bold())?;
            if books.is_empty() {
                writeln!(out, "  (none)")?;
            }
            for book in books {
                let status =
                    if book.is_available() { "available".green() } else { "on loan".yellow() };
                writeln!(out, "  {book} [{status}]")?;
            }
            Ok(())
        }
        Response::Availability { isbn, available, outcome, title } => {
            let title = title.as_deref().unwrap_or(isbn);
            match (*outcome, *available) {
                (AvailabilityChange::NotFound, _) => {
                    writeln!(out, "{} no book with ISBN {isbn}", "Not found:".red())
                }
                (AvailabilityChange::Changed, false) => {
                    writeln!(out, "{} \"{title}\" lent", "Done:".green())
                }
                (AvailabilityChange::Changed, true) => {
                    writeln!(out, "{} \"{title}\" returned", "Done:".green())
                }
                (AvailabilityChange::Unchanged, false) => {
                    writeln!(out, "{} \"{title}\" is already on loan", "Note:".yellow())
                }
                (AvailabilityChange::Unchanged, true) => {
                    writeln!(out, "{} \"{title}\" was already available", "Note:".yellow())
                }
            }
        }
        Response::Stats(stats) => {
            writeln!(out, "Books catalogued: {}", stats.total)?;
            writeln!(out, "Books available:  {}", stats.available)?;
            writeln!(out, "Tree height:      {}", stats.height)
        }
        Response::Diagram { text } => write!(out, "{text}"),
        Response::Verified { violation: None } => {
            writeln!(out, "{} ordering, balance and heights hold", "OK:".green())
        }
        Response::Verified { violation: Some(violation) } => {
            writeln!(out, "{} {violation}", "Broken:".red().bold())
        }
        Response::Help { text } => writeln!(out, "{text}"),
        Response::Quit => Ok(()),
    }
}
