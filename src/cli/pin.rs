//! Pin command handler
//!
//! Create, inspect, edit and export pins.

use crate::cli::open_tracker;
use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::pin::{AlertSound, Pin, PinPatch};
use crate::tracker::GeofenceTracker;
use clap::{Args, Subcommand};
use std::str::FromStr;

/// Pin command arguments
#[derive(Args)]
pub struct PinArgs {
    #[command(subcommand)]
    pub command: Option<PinCommand>,
}

/// Pin subcommands
#[derive(Subcommand)]
pub enum PinCommand {
    /// Drop a new pin
    Add {
        /// Latitude
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        /// Pin name
        #[arg(long, short = 'n')]
        name: String,

        /// Alert radius in meters
        #[arg(long, short = 'r')]
        radius: Option<u32>,

        /// Display color
        #[arg(long, short = 'c')]
        color: Option<String>,

        /// Alert tone (beep1..beep4)
        #[arg(long, short = 's')]
        sound: Option<String>,
    },
    /// List all pins
    List,
    /// Show a specific pin
    Show {
        /// Pin ID or unique prefix
        id: String,
    },
    /// Edit a pin's attributes
    Edit {
        /// Pin ID or unique prefix
        id: String,

        #[arg(long, short = 'n')]
        name: Option<String>,

        #[arg(long, short = 'c')]
        color: Option<String>,

        /// Alert radius in meters
        #[arg(long, short = 'r')]
        radius: Option<u32>,

        /// Alert tone (beep1..beep4)
        #[arg(long, short = 's')]
        sound: Option<String>,
    },
    /// Move a pin to a new location
    Move {
        /// Pin ID or unique prefix
        id: String,

        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
    /// Delete a pin
    Delete {
        /// Pin ID or unique prefix
        id: String,
    },
    /// Export all pins
    Export {
        /// Output format
        #[arg(long, short = 'f', default_value = "json")]
        format: String,

        /// Write output to file
        #[arg(long, short = 'o')]
        output: Option<String>,
    },
}

/// Run the pin command
pub async fn run(args: PinArgs) -> Result<()> {
    let config = Config::load()?;
    let mut tracker = open_tracker(&config)?;

    match args.command.unwrap_or(PinCommand::List) {
        PinCommand::Add {
            lat,
            lng,
            name,
            radius,
            color,
            sound,
        } => {
            let mut spec = config.new_pin(Coordinates::new(lat, lng), name);
            if let Some(meters) = radius {
                spec = spec.with_alert_distance(meters);
            }
            if let Some(color) = color {
                spec = spec.with_color(color);
            }
            if let Some(sound) = sound {
                spec = spec.with_sound(parse_sound(&sound)?);
            }

            let pin = tracker.add_pin(spec)?;
            println!("Added pin {} ({})", pin.name, pin.id);
            Ok(())
        }
        PinCommand::List => list_pins(&tracker, &config),
        PinCommand::Show { id } => show_pin(&tracker, &config, &id),
        PinCommand::Edit {
            id,
            name,
            color,
            radius,
            sound,
        } => {
            let patch = PinPatch {
                name,
                color,
                alert_distance: radius,
                alert_sound: sound.as_deref().map(parse_sound).transpose()?,
            };
            if patch.is_empty() {
                return Err(Error::InvalidPin("nothing to change".to_string()));
            }

            let id = tracker.resolve_id(&id)?;
            let pin = tracker.update_pin(&id, patch)?;
            println!("Updated pin {} ({})", pin.name, pin.id);
            Ok(())
        }
        PinCommand::Move { id, lat, lng } => {
            let id = tracker.resolve_id(&id)?;
            let pin = tracker.move_pin(&id, Coordinates::new(lat, lng))?;
            println!("Moved pin {} to {}", pin.name, pin.position);
            Ok(())
        }
        PinCommand::Delete { id } => {
            let id = tracker.resolve_id(&id)?;
            let pin = tracker.remove_pin(&id)?;
            println!("Deleted pin {} ({})", pin.name, pin.id);
            Ok(())
        }
        PinCommand::Export { format, output } => export_pins(&tracker, &config, &format, output),
    }
}

fn parse_sound(s: &str) -> Result<AlertSound> {
    AlertSound::from_str(s).map_err(Error::InvalidPin)
}

/// List pins in insertion order
fn list_pins(tracker: &GeofenceTracker, config: &Config) -> Result<()> {
    let formatter = get_formatter("text")
        .ok_or_else(|| Error::Config("text formatter missing".to_string()))?;
    print!("{}", formatter.format(tracker.pins(), config)?);
    Ok(())
}

/// Show a single pin with its map link
fn show_pin(tracker: &GeofenceTracker, config: &Config, id: &str) -> Result<()> {
    let id = tracker.resolve_id(id)?;
    let pin: &Pin = tracker
        .pin(&id)
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    let tone = pin.tone();

    println!("Pin: {}", pin.name);
    println!("ID: {}", pin.id);
    println!("Center: {}", pin.position);
    println!("Radius: {}m", pin.alert_distance);
    println!("Color: {}", pin.color);
    println!(
        "Sound: {} ({}Hz, {}ms every {}ms)",
        pin.alert_sound.unwrap_or_default(),
        tone.frequency_hz,
        tone.duration_ms,
        tone.interval_ms
    );
    println!("Map: {}", config.format_url(None, pin.position, &pin.name)?);

    Ok(())
}

/// Export all pins in the requested format
fn export_pins(
    tracker: &GeofenceTracker,
    config: &Config,
    format: &str,
    output: Option<String>,
) -> Result<()> {
    let formatter = get_formatter(format).ok_or_else(|| {
        let names: Vec<String> = available_formats().into_iter().map(|f| f.name).collect();
        Error::Config(format!(
            "Unknown format: {} (available: {})",
            format,
            names.join(", ")
        ))
    })?;

    let rendered = formatter.format(tracker.pins(), config)?;

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)?;
            println!("Exported {} pins to {}", tracker.len(), path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
