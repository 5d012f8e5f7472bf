//! `lector` command line
//!
//! Works against the same file-backed store as the viewer, so documents
//! unlocked or annotated here show up there and vice versa.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::error::ReaderError;
use crate::exams::{ExamBook, ExamEntry};
use crate::library::Catalog;
use crate::persistence::PersistenceGateway;
use crate::session::DocumentSession;
use crate::storage::FileStore;
use crate::viewport::{resolve_with_ceiling, ContainerSize, PageSize, ZoomDirective};

#[derive(Debug, Parser)]
#[command(name = "lector")]
#[command(about = "Personal digital library reader")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List catalog documents and whether they are unlocked.
    Catalog {
        /// Only documents whose title, author or description contain TERM
        #[arg(long, value_name = "TERM")]
        search: Option<String>,
    },
    /// Unlock a document with its license.
    Unlock {
        id: String,
        license: String,
    },
    /// Write a document's highlights to a JSON file.
    Export {
        id: String,
        #[arg(long, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },
    /// Merge highlights from an exported JSON file.
    Import {
        id: String,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Remove every highlight on a page.
    ClearPage {
        id: String,
        page: u32,
    },
    /// List notes across all documents.
    Notes {
        #[arg(long)]
        json: bool,
    },
    /// Add a note to a page.
    Note {
        id: String,
        page: u32,
        text: String,
    },
    /// Delete a note.
    NoteDelete {
        id: String,
        note_id: String,
    },
    /// List upcoming and past exams.
    Exams {
        #[arg(long)]
        json: bool,
    },
    /// Add an exam.
    ExamAdd {
        title: String,
        /// Calendar date, YYYY-MM-DD
        date: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an exam.
    ExamDelete {
        id: String,
    },
    /// Print the render scale for a zoom directive.
    Zoom {
        /// fit-width, fit-page, or a scale such as 1.25 or 125%
        directive: ZoomDirective,
        /// Native page size
        #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"], required = true)]
        page: Vec<f64>,
        /// Available container size, net of padding
        #[arg(long, num_args = 2, value_names = ["WIDTH", "HEIGHT"], required = true)]
        container: Vec<f64>,
    },
}

#[derive(Debug, Serialize)]
struct ExamsOutput<'a> {
    upcoming: Vec<&'a ExamEntry>,
    past: Vec<&'a ExamEntry>,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let config = Config::from_env();
    let gateway = PersistenceGateway::new(Arc::new(FileStore::new(&config.storage.data_dir)));

    match cli.command {
        Commands::Catalog { search } => run_catalog(&config, &gateway, search.as_deref()),
        Commands::Unlock { id, license } => {
            let catalog = load_catalog(&config)?;
            let book = catalog.unlock(&gateway, &id, &license).map_err(report)?;
            println!("Unlocked {} ({})", book.title, book.id);
            Ok(())
        }
        Commands::Export { id, output } => run_export(&config, gateway, &id, &output),
        Commands::Import { id, file } => {
            let raw = fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let mut session = open_session(&config, gateway, &id)?;
            let notice = session.import(&raw).map_err(report)?;
            println!("{notice}");
            Ok(())
        }
        Commands::ClearPage { id, page } => {
            let mut session = open_session(&config, gateway, &id)?;
            let notice = session.clear_page(page).map_err(report)?;
            println!("{notice}");
            Ok(())
        }
        Commands::Notes { json } => run_notes(&gateway, json),
        Commands::Note { id, page, text } => {
            if page == 0 {
                anyhow::bail!("PAGE is 1-based and must be >= 1");
            }
            let mut session = open_session(&config, gateway, &id)?;
            let (note, notice) = session.add_annotation_at(page, &text).map_err(report)?;
            println!("{notice}");
            println!("{}", note.id);
            Ok(())
        }
        Commands::NoteDelete { id, note_id } => {
            let mut session = open_session(&config, gateway, &id)?;
            let notice = session.delete_annotation(&note_id).map_err(report)?;
            println!("{notice}");
            Ok(())
        }
        Commands::Exams { json } => run_exams(gateway, json),
        Commands::ExamAdd {
            title,
            date,
            description,
        } => {
            let mut exams = ExamBook::load(gateway);
            let exam = exams
                .add(&title, &date, description.as_deref())
                .map_err(report)?;
            println!("Added {} on {} ({})", exam.title, exam.date, exam.id);
            Ok(())
        }
        Commands::ExamDelete { id } => {
            let mut exams = ExamBook::load(gateway);
            if exams.delete(&id).map_err(report)? {
                println!("Deleted {id}");
            } else {
                println!("No exam {id}");
            }
            Ok(())
        }
        Commands::Zoom {
            directive,
            page,
            container,
        } => {
            let native = PageSize::new(page[0], page[1]);
            if !(native.width > 0.0 && native.height > 0.0) {
                anyhow::bail!("--page dimensions must be positive");
            }
            let container = ContainerSize::new(container[0].max(0.0), container[1].max(0.0));
            let scale =
                resolve_with_ceiling(directive, native, container, config.viewer.max_fit_scale);
            println!("{scale}");
            Ok(())
        }
    }
}

/// Turn a reader error into the user-facing notice text
fn report(error: ReaderError) -> anyhow::Error {
    anyhow::anyhow!("{}", error.notice())
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    Catalog::load(&config.storage.catalog_path).with_context(|| {
        format!(
            "failed to load catalog {}",
            config.storage.catalog_path.display()
        )
    })
}

fn open_session(config: &Config, gateway: PersistenceGateway, id: &str) -> Result<DocumentSession> {
    let catalog = load_catalog(config)?;
    DocumentSession::open(gateway, &catalog, id, config).map_err(report)
}

fn run_catalog(config: &Config, gateway: &PersistenceGateway, search: Option<&str>) -> Result<()> {
    let catalog = load_catalog(config)?;
    let books = match search {
        Some(term) => catalog.search(term),
        None => catalog.books.iter().collect(),
    };

    for book in books {
        let state = if gateway.is_unlocked(&book.id) {
            "unlocked"
        } else {
            "locked"
        };
        println!("{}\t{}\t{}\t{}", book.id, book.title, book.author, state);
    }
    Ok(())
}

fn run_export(config: &Config, gateway: PersistenceGateway, id: &str, output: &Path) -> Result<()> {
    let session = open_session(config, gateway, id)?;
    let (file, notice) = session
        .export(Utc::now().date_naive())
        .map_err(report)?;

    fs::create_dir_all(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let path = output.join(&file.file_name);
    fs::write(&path, &file.contents)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!("{notice}");
    println!("{}", path.display());
    Ok(())
}

fn run_notes(gateway: &PersistenceGateway, json: bool) -> Result<()> {
    let all = gateway.list_all_annotations();
    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    for book in &all {
        println!("{}", book.book_id);
        for (page, notes) in book.by_page() {
            for note in notes {
                println!("  p.{}\t{}\t{}", page, note.id, note.content);
            }
        }
    }
    Ok(())
}

fn run_exams(gateway: PersistenceGateway, json: bool) -> Result<()> {
    let exams = ExamBook::load(gateway);
    let (upcoming, past) = exams.split(Utc::now().date_naive());

    if json {
        let payload = ExamsOutput { upcoming, past };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Upcoming");
    for exam in &upcoming {
        print_exam(exam);
    }
    println!("Past");
    for exam in &past {
        print_exam(exam);
    }
    Ok(())
}

fn print_exam(exam: &ExamEntry) {
    match &exam.description {
        Some(description) => println!("  {}\t{}\t{}\t{}", exam.date, exam.title, exam.id, description),
        None => println!("  {}\t{}\t{}", exam.date, exam.title, exam.id),
    }
}
