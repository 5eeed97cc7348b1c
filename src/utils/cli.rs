//! Running the CLI

// Allow exits because in this file we ideally handle all errors with known exit codes
#![allow(clippy::exit)]

use crate::db;
use crate::server::app::serve_milestones;
use crate::utils::config::{Config, DEFAULT_CONFIG_FILE};
use crate::utils::logging::init_tracing;
use clap::Parser;
use std::path::PathBuf;

/// Milestone tracking for wiki articles.
/// Serves the article milestone pages, the batch editor and the calendar.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_FILE))]
    config: String,
    /// Milestones cli subcommands
    #[command(subcommand)]
    subcommands: Subcommands,
}

///
#[derive(Clone, clap::Subcommand)]
enum Subcommands {
    /// Serve the milestone pages and calendar feed
    Serve {
        /// Port to serve on. Overrides `server.port`.
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind to. Overrides `server.bind`.
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Create or upgrade the database schema, then exit
    Migrate,
}

/// Main entrypoint to application
///
/// # Errors
/// Errors if the HTTP server cannot bind or stops with an I/O error.
pub fn run() -> std::io::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(&PathBuf::from(&cli.config)).unwrap_or_else(|err| {
        eprintln!("error: could not load configuration from `{}`: {err:?}", cli.config);
        std::process::exit(1);
    });
    let _guard = init_tracing(&config.logging);
    tracing::debug!("Starting application");

    match cli.subcommands {
        Subcommands::Serve { port, bind } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            serve_milestones(config)
        }
        Subcommands::Migrate => migrate(&config),
    }
}

/// Apply database migrations.
#[actix_web::main]
async fn migrate(config: &Config) -> std::io::Result<()> {
    match db::init::connect(&config.database).await {
        Ok(_) => {
            tracing::info!("Database is up to date");
            Ok(())
        }
        Err(err) => {
            tracing::error!("error: could not migrate database: {err:?}");
            std::process::exit(1);
        }
    }
}
