//! Book catalog and library shelf commands

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use shelfquest::stats::ShelfManager;
use shelfquest::{BookRef, ReadingStatus};

use super::truncate;

#[derive(Subcommand)]
pub enum BookCommand {
    /// Add a book to the local catalog
    Add {
        title: String,
        author: String,

        /// Page count, if known
        #[arg(long)]
        pages: Option<u32>,
    },
}

/// Identifies a library entry by local book id or external catalog key
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct BookSelector {
    /// Local catalog book id
    #[arg(long)]
    book_id: Option<i64>,

    /// External catalog key (e.g. /works/OL45804W)
    #[arg(long)]
    external: Option<String>,
}

impl BookSelector {
    fn book_ref(&self) -> Result<BookRef> {
        match (self.book_id, &self.external) {
            (Some(id), None) => Ok(BookRef::Internal(id)),
            (None, Some(key)) => Ok(BookRef::External(key.clone())),
            _ => Err(anyhow!("Pass exactly one of --book-id or --external")),
        }
    }
}

#[derive(Subcommand)]
pub enum ShelfCommand {
    /// Put a book on a reader's shelf
    Add {
        username: String,

        #[command(flatten)]
        book: BookSelector,

        /// Title (external books only)
        #[arg(long, default_value = "")]
        title: String,

        /// Author (external books only)
        #[arg(long, default_value = "")]
        author: String,

        /// reading, read, want_to_read or searching
        #[arg(long, default_value = "want_to_read")]
        status: String,

        /// Total chapters in the book
        #[arg(long, default_value_t = 0)]
        chapters: u32,
    },

    /// List a reader's library
    List {
        username: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a book to another shelf
    Status {
        username: String,

        #[command(flatten)]
        book: BookSelector,

        /// reading, read, want_to_read or searching
        status: String,
    },
}

fn parse_status(s: &str) -> Result<ReadingStatus> {
    ReadingStatus::from_str(s).ok_or_else(|| anyhow!("Invalid status: {}", s))
}

pub async fn book_command(shelf: &ShelfManager, cmd: BookCommand) -> Result<()> {
    match cmd {
        BookCommand::Add { title, author, pages } => {
            let book = shelf.recorder().add_book(&title, &author, pages)?;
            println!("Added book {} (id {})", book.title, book.id);
        }
    }
    Ok(())
}

pub async fn shelf_command(shelf: &ShelfManager, cmd: ShelfCommand) -> Result<()> {
    let recorder = shelf.recorder();
    let query = shelf.query();

    match cmd {
        ShelfCommand::Add {
            username,
            book,
            title,
            author,
            status,
            chapters,
        } => {
            let user = query.user_by_name(&username)?;
            let status = parse_status(&status)?;
            let book = match book.book_ref()? {
                BookRef::Internal(id) => recorder.shelve_internal(user.id, id, status, chapters)?,
                BookRef::External(key) => {
                    recorder.shelve_external(user.id, &key, &title, &author, status, chapters)?
                }
            };
            println!("Shelved {} as {}", book, status);
        }
        ShelfCommand::List { username, json } => {
            let user = query.user_by_name(&username)?;
            let library = query.library(user.id)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&library)?);
                return Ok(());
            }
            if library.is_empty() {
                println!("No books on the shelf.");
                return Ok(());
            }

            println!(
                "{:<20} {:<14} {:<10} {:<30} {:<20}",
                "BOOK", "STATUS", "CHAPTERS", "TITLE", "AUTHOR"
            );
            println!("{}", "-".repeat(98));
            for entry in library {
                println!(
                    "{:<20} {:<14} {:<10} {:<30} {:<20}",
                    truncate(&entry.progress.book.to_string(), 18),
                    entry.progress.status.as_str(),
                    format!(
                        "{}/{}",
                        entry.progress.current_chapter, entry.progress.total_chapters
                    ),
                    truncate(&entry.title, 28),
                    truncate(&entry.author, 18),
                );
            }
        }
        ShelfCommand::Status {
            username,
            book,
            status,
        } => {
            let user = query.user_by_name(&username)?;
            let book = book.book_ref()?;
            let status = parse_status(&status)?;
            recorder.set_status(user.id, &book, status)?;
            println!("Moved {} to {}", book, status);
        }
    }
    Ok(())
}
