//! FestWish - festival greetings from the terminal

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use festwish_core::catalog::{Catalogs, RelationshipCategory};
use festwish_core::config::{FestwishConfig, ResolverMode};
use festwish_core::session::Session;

mod browse_cli;
mod content_cli;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "festwish",
    about = "Browse festivals and generate greeting content",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Configuration file (defaults to the platform config directory)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Directory with catalog JSON files (overrides config)
    #[clap(long, global = true)]
    catalog_dir: Option<PathBuf>,

    /// Resolve content through the FestWish API at this URL (overrides config)
    #[clap(long, global = true)]
    remote: Option<String>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Emit logs as JSON lines on stderr
    #[clap(long, global = true)]
    log_json: bool,
}

#[derive(Parser, Debug)]
enum Command {
    /// List festivals
    Festivals {
        /// Only festivals of this religion/culture (exact match)
        #[clap(long)]
        culture: Option<String>,

        /// Only festivals in this month (exact match)
        #[clap(long)]
        month: Option<String>,

        /// Case-insensitive search over name and description
        #[clap(long)]
        search: Option<String>,

        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show one festival by id or slug
    Festival {
        id_or_slug: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// List relationship types
    Relationships {
        /// Only relationships in this category
        #[clap(long)]
        category: Option<RelationshipCategory>,

        /// Output results as JSON
        #[clap(long)]
        json: bool,
    },

    /// List relationship categories
    Categories,

    /// List festival cultures
    Cultures,

    /// Resolve a random message, quote and image
    Content {
        festival_id: String,

        /// Relationship id; without it no message is picked
        #[clap(long)]
        relationship: Option<String>,

        /// Only pick messages with this tone
        #[clap(long)]
        tone: Option<String>,

        /// Number of draws to show
        #[clap(long, default_value_t = 1)]
        refresh: u32,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Preview a wish without sending it
    Preview {
        festival_id: String,

        relationship_id: String,

        /// Recipient name shown on the card
        #[clap(long)]
        recipient: Option<String>,

        /// Custom message; replaces the template message
        #[clap(long)]
        message: Option<String>,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },
}

/// Initialize tracing with CLI flags
fn initialize_tracing(log_level: &LogLevel, json: bool) {
    let filter = EnvFilter::new(log_level.to_filter_directive());

    // Logs go to stderr so JSON output on stdout stays parseable
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Configuration with CLI overrides applied
fn resolve_config(cli: &Cli) -> Result<FestwishConfig> {
    let mut config = FestwishConfig::discover(cli.config.as_deref())?;

    if let Some(dir) = &cli.catalog_dir {
        config.catalog_dir = Some(dir.clone());
    }
    if let Some(url) = &cli.remote {
        config.mode = ResolverMode::Remote;
        config.remote.base_url = url.clone();
    }

    debug!("Effective config: {:?}", config);
    Ok(config)
}

/// Catalogs for the browsing commands, which only read local files
fn browse_catalogs(config: &FestwishConfig) -> Result<Catalogs> {
    if config.mode == ResolverMode::Remote {
        bail!(
            "Browsing reads local catalogs and is not available in remote mode; \
             use local mode (drop --remote or set `mode: local`)"
        );
    }
    config
        .load_catalogs()
        .context("Could not load festival catalogs")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, cli.log_json);

    let config = resolve_config(&cli)?;

    match cli.command {
        Command::Festivals {
            culture,
            month,
            search,
            json,
        } => browse_cli::list_festivals(
            &browse_catalogs(&config)?,
            culture.as_deref(),
            month.as_deref(),
            search.as_deref(),
            json,
        ),
        Command::Festival { id_or_slug, json } => {
            browse_cli::show_festival(&browse_catalogs(&config)?, &id_or_slug, json)
        }
        Command::Relationships { category, json } => {
            browse_cli::list_relationships(&browse_catalogs(&config)?, category, json)
        }
        Command::Categories => browse_cli::list_categories(&browse_catalogs(&config)?),
        Command::Cultures => browse_cli::list_cultures(&browse_catalogs(&config)?),
        Command::Content {
            festival_id,
            relationship,
            tone,
            refresh,
            json,
        } => {
            let session = Session::from_env(&config.remote.token_env);
            let resolver = config.build_resolver(session)?;
            content_cli::execute_content(
                resolver,
                &festival_id,
                relationship.as_deref(),
                tone.as_deref(),
                refresh,
                json,
            )
            .await
        }
        Command::Preview {
            festival_id,
            relationship_id,
            recipient,
            message,
            json,
        } => {
            let session = Session::from_env(&config.remote.token_env);
            let resolver = config.build_resolver(session)?;
            content_cli::execute_preview(
                resolver.as_ref(),
                festival_id,
                relationship_id,
                recipient,
                message,
                json,
            )
            .await
        }
    }
}
