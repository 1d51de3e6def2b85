//! Output formatters
//!
//! Provides trait-based output formatting for pin collections.

pub mod gpx;
pub mod json;
pub mod text;
pub mod url;

use crate::config::Config;
use crate::error::Result;
use crate::pin::Pin;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format the pins, in the order given
    ///
    /// # Arguments
    /// * `pins` - The pins to format
    /// * `config` - Application config (for url providers, etc.)
    fn format(&self, pins: &[Pin], config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        "url" => Some(Box::new(url::UrlFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    ["json", "text", "gpx", "url"]
        .into_iter()
        .filter_map(get_formatter)
        .map(|f| FormatInfo {
            name: f.name().to_string(),
            description: f.description().to_string(),
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::coord::Coordinates;
    use crate::pin::{AlertSound, Pin, PinId};

    pub fn sample_pins() -> Vec<Pin> {
        vec![
            Pin {
                id: PinId::from("home01"),
                position: Coordinates::new(40.7128, -74.0060),
                name: "Home".to_string(),
                color: "red".to_string(),
                alert_distance: 500,
                alert_sound: Some(AlertSound::Beep2),
            },
            Pin {
                id: PinId::from("cafe02"),
                position: Coordinates::new(40.7306, -73.9866),
                name: "Corner & Cafe".to_string(),
                color: "blue".to_string(),
                alert_distance: 150,
                alert_sound: None,
            },
        ]
    }
}
