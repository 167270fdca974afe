//! Shelf - console catalog manager backed by SQLite
//!
//! Without a subcommand `shelf` runs the interactive menu; `list` and
//! `search` print once and exit.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use core_catalog::{CatalogKind, Item};
use core_runtime::logging::{init_logging, LogFormat, LogLevel, LogWriter, LoggingConfig};
use core_runtime::CoreConfig;
use core_service::CatalogService;
use tracing::info;

mod input;
mod menu;
mod render;

use menu::Menu;

/// Catalog to operate on
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Library,
    Users,
}

impl From<KindArg> for CatalogKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Library => CatalogKind::Library,
            KindArg::Users => CatalogKind::Users,
        }
    }
}

/// Log levels
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Compact => LogFormat::Compact,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "shelf", version, about = "Console catalog manager backed by SQLite")]
struct Cli {
    /// SQLite database file (created if missing)
    #[arg(long, env = "SHELF_DATABASE", default_value = "library.db", global = true)]
    database: PathBuf,

    /// Which catalog to open
    #[arg(long, value_enum, default_value_t = KindArg::Library, global = true)]
    kind: KindArg,

    /// Minimum log level (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogLevelArg::Warn, global = true)]
    log_level: LogLevelArg,

    #[arg(long, value_enum, default_value_t = LogFormatArg::Compact, global = true)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every item ordered by title
    List {
        /// Emit JSON instead of text rows
        #[arg(long)]
        json: bool,
    },
    /// Print items whose title or creator contains TERM
    Search {
        term: String,

        /// Emit JSON instead of text rows
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(
        LoggingConfig::default()
            .with_format(cli.log_format.into())
            .with_level(cli.log_level.into())
            .with_writer(LogWriter::Stderr)
            .with_spans(false),
    )
    .context("failed to initialize logging")?;

    let config = CoreConfig::builder()
        .database_path(&cli.database)
        .build()
        .context("invalid configuration")?;

    let service = CatalogService::open(&config, cli.kind.into())
        .await
        .with_context(|| format!("failed to open catalog at {}", cli.database.display()))?;

    match cli.command {
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Menu::new(&service, stdin.lock(), stdout.lock()).run().await?;
        }
        Some(Command::List { json }) => {
            let items = service.list().await.context("failed to list items")?;
            print_items(&items, json)?;
        }
        Some(Command::Search { term, json }) => {
            let items = service
                .search(&term)
                .await
                .with_context(|| format!("search for '{}' failed", term))?;
            print_items(&items, json)?;
        }
    }

    info!("shelf finished");
    Ok(())
}

fn print_items(items: &[Item], json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, items).context("failed to encode items")?;
        writeln!(out)?;
    } else {
        for item in items {
            writeln!(out, "{}", render::item_line(item))?;
        }
    }
    Ok(())
}
