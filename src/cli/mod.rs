//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod check;
pub mod config;
pub mod pin;
pub mod serve;
pub mod status;
pub mod watch;

use crate::config::Config;
use crate::error::Result;
use crate::tracker::GeofenceTracker;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Geofence pins with proximity alerts
#[derive(Parser)]
#[command(name = "pinwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage pins
    Pin(pin::PinArgs),

    /// Check whether a pin can be placed somewhere
    Check(check::CheckArgs),

    /// Read positions from stdin and print proximity alerts
    Watch(watch::WatchArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show pin and server status
    Status(status::StatusArgs),
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve(_) | Commands::Watch(_) => init_tracing("info"),
        _ => init_tracing("warn"),
    }

    match cli.command {
        Commands::Pin(args) => pin::run(args).await,
        Commands::Check(args) => check::run(args).await,
        Commands::Watch(args) => watch::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
    }
}

/// Log to stderr; `RUST_LOG` overrides the default level
fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Load the tracker backed by the configured pin store
pub(crate) fn open_tracker(config: &Config) -> Result<GeofenceTracker> {
    GeofenceTracker::load(Box::new(config.pin_store()?))
}
