//! moviexml CLI - export a movie database to cross-referenced XML files.
//!
//! This is the main entry point for the moviexml command-line application.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moviexml::prelude::*;

/// moviexml - movie database to XML export tool
#[derive(Parser)]
#[command(name = "moviexml")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log library activity to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export movies, people and oscars to XML files
    Export {
        /// Path to the SQLite database (prompted for when omitted)
        #[arg(short, long, env = "MOVIE_DATABASE")]
        database: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, env = "OUTPUT_FOLDER", default_value = ".")]
        output: PathBuf,

        /// Sort ID lists in relation attributes instead of keeping table order
        #[arg(long)]
        sorted_relations: bool,
    },

    /// Re-indent an XML file
    Format {
        /// Input XML file
        #[arg(short, long)]
        input: PathBuf,

        /// Output XML file (defaults to rewriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Export {
            database,
            output,
            sorted_relations,
        } => {
            let order = if sorted_relations {
                RelationOrder::Sorted
            } else {
                RelationOrder::Storage
            };
            cmd_export(database, &output, order)?;
        }
        Commands::Format { input, output } => {
            cmd_format(&input, output.as_deref().unwrap_or(&input))?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "moviexml=debug,moviexml_export=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn cmd_export(database: Option<PathBuf>, output: &Path, order: RelationOrder) -> Result<()> {
    let path = match database {
        Some(path) => path,
        None => prompt_database_path()?,
    };

    println!("Opening database: {}", path.display());

    let start = Instant::now();
    debug!(path = %path.display(), ?order, output = %output.display(), "starting export");
    let database = MovieDatabase::open(&path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;

    // The connection is closed on every path, including failed validation.
    let result = export_documents(&database, output, order);
    let closed = database.close().context("Failed to close database");
    result?;
    closed?;

    println!("Export completed in {:?}", start.elapsed());

    Ok(())
}

fn export_documents(database: &MovieDatabase, output: &Path, order: RelationOrder) -> Result<()> {
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
        .progress_chars("#>-");

    let mut bar: Option<ProgressBar> = None;
    let result = database.export_all(output, order, |event| match event {
        ExportEvent::Started { kind, total } => {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(style.clone());
            pb.set_message(kind.file_name());
            bar = Some(pb);
        }
        ExportEvent::Progress { done, .. } => {
            if let Some(pb) = &bar {
                pb.set_position(done as u64);
            }
        }
        ExportEvent::Written(summary) => {
            if let Some(pb) = bar.take() {
                pb.finish_and_clear();
            }
            println!("{} has been written.", summary.path.display());
        }
    });

    if let Some(pb) = bar.take() {
        pb.abandon();
    }

    match result {
        Ok(_) => Ok(()),
        Err(e) if e.is_validation() => bail!("{}. Please try again.", e),
        Err(e) => Err(e).context("Export failed"),
    }
}

fn cmd_format(input: &Path, output: &Path) -> Result<()> {
    println!("Formatting: {} -> {}", input.display(), output.display());

    let text = fs::read_to_string(input).context("Failed to read input file")?;
    debug!(bytes = text.len(), "read input");
    let formatted = Document::reformat(&text).context("Failed to parse XML")?;
    fs::write(output, formatted).context("Failed to write output file")?;

    println!("Formatting complete");

    Ok(())
}

/// Ask the operator for the database path on stdin.
fn prompt_database_path() -> Result<PathBuf> {
    print!("Please enter the name of the database file:");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read database path")?;

    let path = line.trim();
    if path.is_empty() {
        bail!("No database file given");
    }

    Ok(PathBuf::from(path))
}
