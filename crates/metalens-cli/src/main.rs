use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use metalens_core::{AnalysisStore, Analyzer, MemoryStore, SqliteStore};
use metalens_cli::{render_recent, render_report};
use tracing_subscriber::EnvFilter;

/// metalens: SEO meta tag lens for the web
#[derive(Parser)]
#[command(name = "metalens", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a page and audit its meta tags
    Analyze {
        /// Page to analyze; https:// is assumed when no scheme is given
        url: String,

        /// Print the result as JSON instead of the text report
        #[arg(long)]
        json: bool,

        /// Skip the Google/Twitter/Facebook preview sections
        #[arg(long)]
        no_previews: bool,

        /// SQLite database to append the result to
        #[arg(long, value_name = "PATH")]
        db: Option<PathBuf>,
    },

    /// List analyses stored in a database, newest first
    Recent {
        /// SQLite database written by `analyze --db`
        #[arg(long, value_name = "PATH")]
        db: PathBuf,

        /// Maximum number of analyses to show
        #[arg(short, long, default_value_t = 5)]
        limit: usize,

        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            url,
            json,
            no_previews,
            db,
        } => {
            let store = open_store(db.as_ref())?;
            let analyzer = Analyzer::new(store).context("failed to initialise HTTP client")?;
            let result = analyzer.analyze(&url).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", render_report(&result, !no_previews));
            }
        }
        Command::Recent { db, limit, json } => {
            let store = SqliteStore::open(&db)
                .with_context(|| format!("failed to open database {}", db.display()))?;
            let records = store.list_recent(limit)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print!("{}", render_recent(&records));
            }
        }
    }

    Ok(())
}

fn open_store(db: Option<&PathBuf>) -> Result<Arc<dyn AnalysisStore>> {
    match db {
        Some(path) => {
            let store = SqliteStore::open(path)
                .with_context(|| format!("failed to open database {}", path.display()))?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryStore::new())),
    }
}
