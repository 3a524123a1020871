//! SeaChat CLI — entry point.
//!
//! # Commands
//!
//! - `seachat ask <QUERY> [--data-only]` — gather ocean data and answer once
//! - `seachat chat` — interactive REPL
//! - `seachat classify <QUERY>` — show detected location and topics
//! - `seachat status` — show configuration and model availability
//! - `seachat init` — write a default config

mod app;
mod helpers;
mod init;
mod repl;
mod status;

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use seachat_core::config::load_config;
use seachat_data::QueryClassifier;

use crate::app::App;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🌊 SeaChat — ocean data questions answered with live sources
#[derive(Parser)]
#[command(name = "seachat", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.seachat/config.json
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question
    Ask {
        /// The question, e.g. "sea surface temperature near Mumbai"
        query: String,

        /// Print the gathered data instead of asking a model
        #[arg(long, default_value_t = false)]
        data_only: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Interactive chat (REPL)
    Chat {
        /// Print the gathered data instead of asking a model
        #[arg(long, default_value_t = false)]
        data_only: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show the location and topics detected in a query
    Classify { query: String },

    /// Show configuration and model availability
    Status {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Write a default configuration
    Init,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref().map(helpers::expand_tilde);
    let config_path = config_path.as_deref();

    match cli.command {
        Commands::Ask {
            query,
            data_only,
            logs,
        } => {
            init_logging(logs);
            run_ask(config_path, &query, data_only).await
        }
        Commands::Chat { data_only, logs } => {
            init_logging(logs);
            repl::run(build_app(config_path, data_only)?, logs).await
        }
        Commands::Classify { query } => {
            init_logging(false);
            helpers::print_classification(&QueryClassifier::default().classify(&query));
            Ok(())
        }
        Commands::Status { logs } => {
            init_logging(logs);
            status::run(config_path).await
        }
        Commands::Init => init::run(config_path),
    }
}

async fn run_ask(config_path: Option<&Path>, query: &str, data_only: bool) -> Result<()> {
    let mut app = build_app(config_path, data_only)?;
    info!(query, data_only, "processing single question");
    let answer = app.ask(query).await?;
    helpers::print_answer(&answer);
    Ok(())
}

fn build_app(config_path: Option<&Path>, data_only: bool) -> Result<App> {
    let config = load_config(config_path);
    if data_only {
        Ok(App::data_only(&config))
    } else {
        App::from_config(&config)
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("seachat=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_ask_flags() {
        let cli = Cli::parse_from([
            "seachat",
            "ask",
            "tides in goa",
            "--data-only",
            "--config",
            "/tmp/sea.json",
        ]);
        assert_eq!(cli.config.as_deref(), Some("/tmp/sea.json"));
        match cli.command {
            Commands::Ask {
                query,
                data_only,
                logs,
            } => {
                assert_eq!(query, "tides in goa");
                assert!(data_only);
                assert!(!logs);
            }
            _ => panic!("expected ask"),
        }
    }
}
