//! CLI entry point for the document search system.
//!
//! Provides commands for ingesting text and running similarity searches.
//! Main components: Cli parser, Commands enum, and service construction
//! from layered settings.

use anyhow::Context;
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use docsearch::display::THEME;
use docsearch::io::{ExitCode, OutputFormat, OutputManager};
use docsearch::vector::{DecodeError, codec};
use docsearch::{DocumentService, OllamaClient, Settings, SqliteDatabase, StoreConfig};
use docsearch::{DocumentStore, SearchOutcome};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Document store with embedding search
#[derive(Parser)]
#[command(
    name = "docsearch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Store documents with embeddings and search them by meaning",
    long_about = "Embed text through an Ollama-compatible service, store it in SQLite, and rank stored documents by vector similarity.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
enum Commands {
    /// Initialize project
    #[command(about = "Set up .docsearch directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(
        about = "Display active settings and the resolved embedding endpoint",
        after_help = "Examples:\n  docsearch config\n  DS_STORAGE__METRIC=l2 docsearch config --save .docsearch/settings.toml"
    )]
    Config {
        /// Write the effective settings (file and environment merged) to this path
        #[arg(long, value_name = "PATH")]
        save: Option<PathBuf>,
    },

    /// Embed and store a document
    #[command(
        about = "Embed text and store it as a document",
        after_help = "Examples:\n  docsearch ingest \"Ownership rules in Rust\"\n  docsearch ingest --file notes.md\n  docsearch ingest --file page.html --media-type text/html --json"
    )]
    Ingest {
        /// Text to ingest
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        text: Option<String>,

        /// Read the document content from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Media type to record (guessed from the file extension if omitted)
        #[arg(long)]
        media_type: Option<String>,

        /// File name to record (defaults to the name of --file)
        #[arg(long)]
        file_name: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Rank stored documents by similarity
    #[command(
        about = "Find the stored documents closest to a query",
        after_help = "Examples:\n  docsearch search \"memory safety\"\n  docsearch search \"memory safety\" --limit 10 --json\n  docsearch search --vector \"[0.1,0.2,0.3]\""
    )]
    Search {
        /// Text to embed and search with
        #[arg(required_unless_present = "vector", conflicts_with = "vector")]
        query: Option<String>,

        /// Search with a vector literal instead of text, e.g. "[0.1,0.2]"
        #[arg(long)]
        vector: Option<String>,

        /// Maximum number of results (defaults to search.default_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path).with_context(|| {
            format!("Configuration error loading from {}", path.display())
        }),
        None => Settings::load().context("Configuration error"),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", THEME.error_with_icon(&format!("{e:#}")));
            return ExitCode::ConfigError.into();
        }
    };

    init_logging(&settings.logging.level);

    match run(cli.command, settings) {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("{}", THEME.error_with_icon(&format!("{e:#}")));
            ExitCode::GeneralError.into()
        }
    }
}

/// Logs go to stderr so `--json` output on stdout stays clean.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands, settings: Settings) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Init { force } => {
            let path = Settings::init_config_file(force)
                .map_err(|e| anyhow::anyhow!("{e}"))
                .context("Could not create configuration file")?;
            println!(
                "{}",
                THEME.success_with_icon(&format!(
                    "Created configuration file at: {}",
                    path.display()
                ))
            );
            println!("Edit this file to customize your settings.");
            Ok(ExitCode::Success)
        }

        Commands::Config { save } => {
            if let Err(warning) = Settings::check_init() {
                eprintln!("{}", THEME.warning_with_icon(&warning));
            }
            show_config(&settings)?;

            if let Some(path) = save {
                settings
                    .save(&path)
                    .map_err(|e| anyhow::anyhow!("{e}"))
                    .with_context(|| format!("Could not save settings to {}", path.display()))?;
                println!(
                    "{}",
                    THEME.success_with_icon(&format!("Saved settings to: {}", path.display()))
                );
            }
            Ok(ExitCode::Success)
        }

        Commands::Ingest {
            text,
            file,
            media_type,
            file_name,
            json,
        } => {
            let mut output = OutputManager::new(OutputFormat::from_json_flag(json));

            let (content, media_type, file_name) = match (text, file) {
                (Some(text), _) => (text, media_type, file_name),
                (None, Some(path)) => {
                    let content = match std::fs::read_to_string(&path) {
                        Ok(content) => content,
                        Err(e) => {
                            eprintln!(
                                "{}",
                                THEME.error_with_icon(&format!(
                                    "Cannot read {}: {e}",
                                    path.display()
                                ))
                            );
                            return Ok(ExitCode::IoError);
                        }
                    };
                    let media_type = media_type.or_else(|| guess_media_type(&path));
                    let file_name = file_name.or_else(|| {
                        path.file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                    });
                    (content, media_type, file_name)
                }
                (None, None) => anyhow::bail!("Nothing to ingest: pass TEXT or --file"),
            };

            let service = open_service(&settings)?;
            match service.ingest_document(&content, media_type.as_deref(), file_name.as_deref()) {
                Ok(document) => Ok(output.document(&document)?),
                Err(e) => Ok(output.error(&e)?),
            }
        }

        Commands::Search {
            query,
            vector,
            limit,
            json,
        } => {
            let mut output = OutputManager::new(OutputFormat::from_json_flag(json));
            let limit = limit.unwrap_or(settings.search.default_limit);

            // Reject a bad literal before the database is touched
            let embedding = match vector.as_deref().map(parse_query_vector).transpose() {
                Ok(embedding) => embedding,
                Err(e) => {
                    eprintln!("{}", THEME.error_with_icon(&e));
                    return Ok(ExitCode::InvalidInput);
                }
            };
            let service = open_service(&settings)?;

            let (label, result): (String, _) = match (query, vector, embedding) {
                (Some(query), _, _) => {
                    let result = service.query_by_text(&query, limit);
                    (query, result)
                }
                (None, Some(literal), Some(embedding)) => {
                    (literal, service.query_by_vector(&embedding, limit))
                }
                _ => anyhow::bail!("Nothing to search for: pass QUERY or --vector"),
            };

            match result {
                Ok(outcome) => {
                    log_outcome(&outcome);
                    Ok(output.search_results(&outcome, &label)?)
                }
                Err(e) => Ok(output.error(&e)?),
            }
        }
    }
}

type Service = DocumentService<OllamaClient, SqliteDatabase>;

/// Builds the embedding client and opens the database.
///
/// The endpoint is resolved exactly once here.
fn open_service(settings: &Settings) -> anyhow::Result<Service> {
    let endpoint = settings.embedding.resolve_endpoint();
    let client = OllamaClient::new(
        &endpoint,
        settings.embedding.model.clone(),
        settings.embedding.timeout(),
    )
    .context("Failed to build HTTP client")?;
    info!(
        "Embedding endpoint: {} (model: {})",
        client.endpoint(),
        settings.embedding.model
    );

    let store_config: StoreConfig = settings.storage.store_config();
    let database = open_database(&settings.database_path())?;
    debug!(
        "Store: dimension={}, metric={}",
        store_config.dimension, store_config.metric
    );

    Ok(DocumentService::new(
        client,
        DocumentStore::new(database, store_config),
    ))
}

fn open_database(path: &Path) -> anyhow::Result<SqliteDatabase> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create database directory {}", parent.display()))?;
    }
    SqliteDatabase::open(path)
        .with_context(|| format!("Cannot open database at {}", path.display()))
}

fn show_config(settings: &Settings) -> anyhow::Result<()> {
    println!("{}", THEME.heading("Current Configuration:"));
    println!("{}", "=".repeat(50));
    println!("{}", toml::to_string_pretty(settings)?);

    println!("{}", THEME.heading("Resolved:"));
    println!(
        "  embedding endpoint: {}",
        THEME.apply(&THEME.path, settings.embedding.resolve_endpoint())
    );

    let metric = settings.storage.metric;
    println!(
        "  ranking:            {metric} distance (pgvector {}), similarity = 1 - distance",
        metric.pgvector_operator()
    );

    let db_path = settings.database_path();
    println!(
        "  database:           {}",
        THEME.apply(&THEME.path, db_path.display())
    );
    if db_path.exists() {
        let count = SqliteDatabase::open(&db_path)
            .and_then(|db| db.document_count())
            .with_context(|| format!("Cannot read database at {}", db_path.display()))?;
        println!("  documents:          {}", THEME.apply(&THEME.number, count));
    }
    Ok(())
}

/// Parses a `--vector` literal, describing the first bad component.
fn parse_query_vector(literal: &str) -> Result<Vec<f32>, String> {
    codec::decode(literal).map_err(|e| match e {
        DecodeError::InvalidComponent { index, token } => format!(
            "Invalid --vector literal '{literal}': component {index} ('{token}') is not a finite number"
        ),
    })
}

fn log_outcome(outcome: &SearchOutcome) {
    debug!(
        "Search returned {} results, {} skipped",
        outcome.results.len(),
        outcome.skipped
    );
}

/// Media type for common text formats, keyed by file extension.
fn guess_media_type(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "txt" | "text" | "log" => "text/plain",
        "md" | "markdown" => "text/markdown",
        "html" | "htm" => "text/html",
        "csv" => "text/csv",
        "json" => "application/json",
        "toml" => "application/toml",
        "xml" => "application/xml",
        "yaml" | "yml" => "application/yaml",
        "rs" => "text/x-rust",
        _ => return None,
    };
    Some(media_type.to_string())
}
