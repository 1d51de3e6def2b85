//! pinwatch CLI entry point
//!
//! Geofenced map pins with proximity alerts - CLI + web app

use pinwatch::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
