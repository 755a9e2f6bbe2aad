use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qode_core::AppConfig;

mod commands;
mod trace;

#[derive(Parser)]
#[command(name = "qode")]
#[command(author, version, about = "Drive the Qode auto-hide engine from scroll traces")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.config/qode/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

/// Shape of the scroll container the trace was recorded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Container {
    /// Plain scroll container: {"offset", "max_offset"}
    Offset,
    /// Index-virtualized list: {"first_visible_item_index", "first_visible_item_scroll_offset", "total_items_count"}
    List,
    /// Fixed-column grid, same fields as list
    Grid,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded JSON-lines trace and print every decision
    Replay {
        /// Trace file
        file: PathBuf,
        #[arg(short = 'k', long, value_enum, default_value_t = Container::Offset)]
        container: Container,
        /// Emit JSON lines instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Read samples from stdin and print visibility changes live
    Watch {
        #[arg(short = 'k', long, value_enum, default_value_t = Container::Offset)]
        container: Container,
        /// Emit JSON lines instead of text
        #[arg(long)]
        json: bool,
        /// Print every step, not only visibility changes
        #[arg(short, long)]
        verbose: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);
    // A broken config file must not block `config path` or `config init`
    let loaded = AppConfig::load_from(&config_path);
    let log_level = loaded
        .as_ref()
        .map(|config| config.general.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Initialize logging on stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or(log_level),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Replay {
            file,
            container,
            json,
        } => commands::replay::run(&loaded?, &file, container, json).await,
        Commands::Watch {
            container,
            json,
            verbose,
        } => commands::watch::run(&loaded?, container, json, verbose).await,
        Commands::Config { action } => commands::config::run(action, &config_path),
    }
}
