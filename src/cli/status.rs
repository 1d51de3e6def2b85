//! Status command handler
//!
//! Summarizes stored pins and optionally probes a running server.

use crate::cli::open_tracker;
use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    if args.server {
        check_server_status(&config).await;
    }

    let tracker = open_tracker(&config)?;

    println!("pinwatch v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Pins file: {}", config.pins_path()?.display());
    println!("Pins: {}", tracker.len());

    if let Some(smallest) = tracker.pins().iter().map(|p| p.alert_distance).min() {
        let largest = tracker
            .pins()
            .iter()
            .map(|p| p.alert_distance)
            .max()
            .unwrap_or(smallest);
        println!("  Alert radii: {}m - {}m", smallest, largest);
    }

    println!(
        "Defaults: {}m, {}, {}",
        config.pins.alert_distance, config.pins.color, config.pins.sound
    );

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                println!("Server: RUNNING on {}", config.server_addr());
                if let Ok(status) = response.json::<serde_json::Value>().await {
                    if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                        println!("  Version: {}", version);
                    }
                    if let Some(pins) = status.get("pins").and_then(|v| v.as_u64()) {
                        println!("  Pins: {}", pins);
                    }
                    if let Some(active) = status.get("activeAlerts").and_then(|v| v.as_u64()) {
                        println!("  Active alerts: {}", active);
                    }
                }
            } else {
                println!("Server: ERROR (status {})", response.status());
            }
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", config.server_addr());
        }
    }
    println!();
}
