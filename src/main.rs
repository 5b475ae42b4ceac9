use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use pulse::analysis::analyzer::{Analyzer, Comment};
use pulse::analysis::category::CategoryRules;
use pulse::analysis::lexicon::PolarityLexicon;
use pulse::analysis::tokenize::StopwordFilter;
use pulse::analytics;
use pulse::config::Config;
use pulse::db::Database;
use pulse::ingest;
use pulse::output::terminal;
use pulse::pipeline::{bulk, submit};
use pulse::sentiment::classifier::SentimentClassifier;
use pulse::sentiment::openai::OpenAiCompletion;

/// Pulse: sentiment, category, and theme analysis for student feedback.
///
/// Classifies each comment as positive, negative, or neutral, files it under
/// a category, and keeps a running tally of the keywords people mention.
#[derive(Parser)]
#[command(name = "pulse", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Analyze a comment without storing it
    Analyze {
        text: String,

        /// Category hint (course, faculty, facilities, events, general)
        #[arg(long)]
        category: Option<String>,
    },

    /// Analyze and store a comment
    Submit {
        text: String,

        /// Category hint (course, faculty, facilities, events, general)
        #[arg(long)]
        category: Option<String>,
    },

    /// Bulk-load feedback from a .csv, .tsv, .xlsx, or .xls file
    Ingest {
        file: PathBuf,

        /// Rows analyzed in parallel (default: PULSE_BULK_CONCURRENCY or 4)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Show sentiment counts and percentages
    Analytics {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the most frequent (keyword, sentiment) themes
    Themes {
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Show the sentiment breakdown for one category
    Category { name: String },

    /// Show system status (backend, classifier, row counts)
    Status,

    /// Run the HTTP API
    #[cfg(feature = "web")]
    Serve {
        /// Listen address (default: PULSE_BIND or 127.0.0.1:8000)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pulse=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing Pulse database...");
            let config = Config::load()?;
            let db = init_database(&config).await?;
            let table_count = db.table_count().await?;
            println!("Database: {}", pulse::status::backend_label(&config));
            println!("Tables: {table_count}");
            println!("\nPulse is ready. Try:");
            println!("  pulse submit \"The library needs better lighting\"");
        }

        Commands::Analyze { text, category } => {
            let config = Config::load()?;
            let analyzer = create_analyzer(&config)?;
            let comment = Comment::new(text, category)?;
            let result = analyzer.analyze(&comment).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Submit { text, category } => {
            let config = Config::load()?;
            let analyzer = create_analyzer(&config)?;
            let comment = Comment::new(text, category)?;
            let db = open_database(&config).await?;
            let stored = submit::submit(&analyzer, db.as_ref(), &comment).await?;
            terminal::display_submission(&stored);
        }

        Commands::Ingest { file, concurrency } => {
            let config = Config::load()?;
            let analyzer = create_analyzer(&config)?;
            let upload = ingest::read_path(&file)?;
            let db = open_database(&config).await?;

            println!(
                "Loaded {} rows from {} ({} blank)",
                upload.rows.len(),
                file.display(),
                upload.empty_rows
            );
            let concurrency = concurrency.unwrap_or(config.bulk_concurrency);
            let report = bulk::ingest(&analyzer, db.as_ref(), upload, concurrency, true).await?;
            terminal::display_bulk_report(&report);
        }

        Commands::Analytics { json } => {
            let config = Config::load()?;
            let db = open_database(&config).await?;
            let breakdown = analytics::overall(db.as_ref()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else {
                terminal::display_breakdown(&breakdown);
            }
        }

        Commands::Themes { limit } => {
            let config = Config::load()?;
            let db = open_database(&config).await?;
            let themes = analytics::top_themes(db.as_ref(), limit).await?;
            terminal::display_themes(&themes);
        }

        Commands::Category { name } => {
            let config = Config::load()?;
            let db = open_database(&config).await?;
            match analytics::for_category(db.as_ref(), &name).await? {
                Some(breakdown) => {
                    let entries = db.feedback_by_category(&breakdown.category).await?;
                    terminal::display_category(&breakdown, &entries);
                }
                None => println!("{}", analytics::no_feedback_message(&name).yellow()),
            }
        }

        Commands::Status => {
            let config = Config::load()?;
            if !pulse::status::is_initialized(&config) {
                println!("Database: not initialized");
                println!("\nRun `pulse init` to set up the database.");
                return Ok(());
            }
            let db = open_database(&config).await?;
            pulse::status::show(db.as_ref(), &config).await?;
        }

        #[cfg(feature = "web")]
        Commands::Serve { bind } => {
            let mut config = Config::load()?;
            if let Some(bind) = bind {
                config.bind = bind;
            }
            let analyzer = Arc::new(create_analyzer(&config)?);
            let db = init_database(&config).await?;
            pulse::web::run_server(config, db, analyzer).await?;
        }
    }

    Ok(())
}

fn is_postgres_url(url: &str) -> bool {
    url.starts_with("postgres://") || url.starts_with("postgresql://")
}

/// Select the database backend based on configuration.
///
/// When DATABASE_URL points to PostgreSQL, uses the Postgres backend
/// (requires the `postgres` feature). Otherwise opens the SQLite file.
async fn open_database(config: &Config) -> Result<Arc<dyn Database>> {
    if let Some(url) = config.database_url.as_deref().filter(|u| is_postgres_url(u)) {
        return connect_postgres(url).await;
    }
    open_sqlite(&config.db_path, false)
}

/// Like `open_database`, but creates the SQLite file when missing.
async fn init_database(config: &Config) -> Result<Arc<dyn Database>> {
    if let Some(url) = config.database_url.as_deref().filter(|u| is_postgres_url(u)) {
        return connect_postgres(url).await;
    }
    open_sqlite(&config.db_path, true)
}

#[cfg(feature = "postgres")]
async fn connect_postgres(url: &str) -> Result<Arc<dyn Database>> {
    info!("Using PostgreSQL backend");
    pulse::db::connect_postgres(url).await
}

#[cfg(not(feature = "postgres"))]
async fn connect_postgres(_url: &str) -> Result<Arc<dyn Database>> {
    anyhow::bail!(
        "DATABASE_URL points to PostgreSQL but the 'postgres' feature is not compiled in.\n\
         Rebuild with: cargo build --features postgres"
    )
}

#[cfg(feature = "sqlite")]
fn open_sqlite(db_path: &str, create: bool) -> Result<Arc<dyn Database>> {
    if create {
        pulse::db::initialize_sqlite(db_path)
    } else {
        pulse::db::open_sqlite(db_path)
    }
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_db_path: &str, _create: bool) -> Result<Arc<dyn Database>> {
    anyhow::bail!(
        "No database configured: set DATABASE_URL to a postgres:// URL, \
         or rebuild with the 'sqlite' feature."
    )
}

/// Build the analyzer: shared stopwords and category rules, plus a classifier
/// that tries the completion service first when one is configured.
fn create_analyzer(config: &Config) -> Result<Analyzer> {
    config.require_llm()?;

    let lexicon = Arc::new(PolarityLexicon::default());
    let classifier = if config.use_completion_service() {
        let service = OpenAiCompletion::new(
            config.openai_api_key.clone(),
            config.llm_url.clone(),
            config.llm_model.clone(),
            config.llm_timeout,
        )?;
        info!(model = %config.llm_model, "Using completion service for sentiment");
        SentimentClassifier::new(Arc::new(service), lexicon, config.llm_timeout)
    } else {
        info!("Using local lexicon for sentiment");
        SentimentClassifier::lexicon_only(lexicon)
    };

    Ok(Analyzer::new(
        Arc::new(StopwordFilter::english()),
        Arc::new(CategoryRules::default()),
        classifier,
    ))
}
