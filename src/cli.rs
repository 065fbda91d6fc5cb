//! Command-line front end: runs the books API or drives the filter engine
//! against a running one.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::catalog::filter::RatingRangeError;
use crate::catalog::{
    Book, BookApi, BookId, CatalogError, CriteriaUpdate, FilterEngine, GenreFilter, HttpCatalog,
    NewBook, RatingRange, ReadingStatus, StatusFilter,
};
use crate::config::{ClientConfig, Config};
use crate::store::StoreError;

/// Book tracker: browse a library and keep track of what you are reading
#[derive(Debug, Parser)]
#[command(name = "book-tracker")]
#[command(version)]
#[command(about = "Browse a book library and track reading status")]
pub struct Cli {
    /// Books API base URL (falls back to API_BASE_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the books API from a JSON data file
    Serve {
        /// Bind address (falls back to HOST)
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port (falls back to PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Data file (falls back to DATA_FILE)
        #[arg(long)]
        data_file: Option<PathBuf>,
    },

    /// List books matching the given filters
    List {
        /// Case-insensitive text matched against title and author
        #[arg(short, long, default_value = "")]
        search: String,

        /// Exact genre, or "all"
        #[arg(short, long, default_value = "all")]
        genre: String,

        /// read, reading, want-to-read, or "all"
        #[arg(long, default_value = "all")]
        status: String,

        /// "any", MIN-MAX (e.g. 3.0-3.9) or a single rating
        #[arg(short, long, default_value = "any")]
        rating: String,
    },

    /// List the genres present in the library
    Genres,

    /// Show one book
    Show { id: BookId },

    /// Change a book's reading status
    SetStatus {
        id: BookId,

        #[arg(value_parser = parse_status)]
        status: ReadingStatus,
    },

    /// Add a book to the library
    Add {
        #[arg(long)]
        title: String,

        #[arg(long)]
        author: String,

        #[arg(long, default_value = "")]
        cover: String,

        #[arg(long, default_value_t = 0.0)]
        rating: f64,

        #[arg(long, default_value_t = 0)]
        pages: u32,

        #[arg(long, default_value = "")]
        genre: String,

        #[arg(long, value_parser = parse_status, default_value = "want-to-read")]
        status: ReadingStatus,
    },

    /// Remove a book from the library
    Remove { id: BookId },
}

impl Commands {
    pub fn is_server(&self) -> bool {
        matches!(self, Self::Serve { .. })
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Rating(#[from] RatingRangeError),
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

impl CliError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Catalog(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

fn parse_status(value: &str) -> Result<ReadingStatus, String> {
    ReadingStatus::parse(value)
        .ok_or_else(|| format!("unknown status `{value}`, expected read, reading or want-to-read"))
}

// ============================================================
// Dispatch
// ============================================================

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let mut client_config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url {
        client_config.api_base_url = api_url;
    }

    match cli.command {
        Commands::Serve {
            host,
            port,
            data_file,
        } => {
            let mut config = Config::from_env();
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(data_file) = data_file {
                config.data_file = data_file;
            }
            serve(config).await
        }
        Commands::List {
            search,
            genre,
            status,
            rating,
        } => {
            let update = CriteriaUpdate::default()
                .search(search)
                .genre(GenreFilter::parse(&genre))
                .status(StatusFilter::parse(&status))
                .rating(RatingRange::parse(&rating)?);

            let engine = FilterEngine::new(HttpCatalog::new(&client_config));
            engine.refresh().await?;
            engine.set_criteria(update);
            print!(
                "{}",
                render_list(&engine.visible_books(), engine.visible_count())
            );
            Ok(())
        }
        Commands::Genres => {
            let engine = FilterEngine::new(HttpCatalog::new(&client_config));
            engine.refresh().await?;
            for genre in engine.available_genres() {
                println!("{genre}");
            }
            Ok(())
        }
        Commands::Show { id } => {
            let book = HttpCatalog::new(&client_config).fetch_one(id).await?;
            print!("{}", render_detail(&book));
            Ok(())
        }
        Commands::SetStatus { id, status } => {
            let engine = FilterEngine::new(HttpCatalog::new(&client_config));
            engine.refresh().await?;
            engine.set_status(id, status).await?;
            match engine.book(id) {
                Some(book) => println!("{} is now {}", book.title, book.status),
                None => println!("Book {id} is now {status}"),
            }
            Ok(())
        }
        Commands::Add {
            title,
            author,
            cover,
            rating,
            pages,
            genre,
            status,
        } => {
            let new_book = NewBook {
                title,
                author,
                cover,
                rating,
                pages,
                genre,
                status,
            };
            let book = HttpCatalog::new(&client_config).add_book(&new_book).await?;
            println!("Added book {}: {}", book.id, book.title);
            Ok(())
        }
        Commands::Remove { id } => {
            let book = HttpCatalog::new(&client_config).delete_book(id).await?;
            println!("Removed book {}: {}", book.id, book.title);
            Ok(())
        }
    }
}

pub async fn serve(config: Config) -> Result<(), CliError> {
    let app = crate::create_app(&config).await?;

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, data_file = %config.data_file.display(), "books API listening");
    tracing::info!(origins = ?config.cors_origins, "CORS origins");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("books API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ============================================================
// Rendering
// ============================================================

/// Rows for `books` followed by the `count` summary line.
pub fn render_list(books: &[Book], count: usize) -> String {
    let mut out = String::new();
    for book in books {
        out.push_str(&format!(
            "{:>4}  {} by {}  [{}]  {:.1}  {}\n",
            book.id, book.title, book.author, book.genre, book.rating, book.status
        ));
    }
    if books.is_empty() {
        out.push_str("No books found matching your criteria\n");
    }
    out.push_str(&found_line(count));
    out.push('\n');
    out
}

pub fn found_line(count: usize) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} book{plural} found")
}

pub fn render_detail(book: &Book) -> String {
    format!(
        "{}\n  Author: {}\n  Rating: {}\n  Pages:  {}\n  Genre:  {}\n  Status: {}\n  Cover:  {}\n",
        book.title, book.author, book.rating, book.pages, book.genre, book.status, book.cover
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Book {
        Book {
            id: 3,
            title: "Laskar Pelangi".into(),
            author: "Andrea Hirata".into(),
            cover: "https://covers.test/3.jpg".into(),
            rating: 4.5,
            pages: 529,
            genre: "Fiction".into(),
            status: ReadingStatus::Reading,
        }
    }

    #[test]
    fn found_line_pluralizes() {
        assert_eq!(found_line(1), "1 book found");
        assert_eq!(found_line(0), "0 books found");
        assert_eq!(found_line(12), "12 books found");
    }

    #[test]
    fn empty_list_says_so_and_still_counts() {
        assert_eq!(
            render_list(&[], 0),
            "No books found matching your criteria\n0 books found\n"
        );
    }

    #[test]
    fn list_shows_status_and_count() {
        let out = render_list(&[sample()], 1);
        assert!(out.contains("Laskar Pelangi by Andrea Hirata"));
        assert!(out.contains("reading"));
        assert!(out.ends_with("1 book found\n"));
    }

    #[test]
    fn parses_command_line() {
        let cli = Cli::try_parse_from([
            "book-tracker",
            "--api-url",
            "http://books.test",
            "set-status",
            "2",
            "want-to-read",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://books.test"));
        assert!(matches!(
            cli.command,
            Commands::SetStatus {
                id: 2,
                status: ReadingStatus::WantToRead
            }
        ));
    }

    #[test]
    fn rejects_unknown_status_argument() {
        let result = Cli::try_parse_from(["book-tracker", "set-status", "2", "done"]);
        assert!(result.is_err());
    }
}
