//! Human-readable text output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::pin::Pin;

/// Text formatter - outputs a human-readable listing
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable listing"
    }

    fn format(&self, pins: &[Pin], _config: &Config) -> Result<String> {
        if pins.is_empty() {
            return Ok("No pins.\n".to_string());
        }

        let mut output = format!("Pins ({}):\n\n", pins.len());

        for pin in pins {
            let sound = pin
                .alert_sound
                .map(|s| s.to_string())
                .unwrap_or_else(|| "default".to_string());

            output.push_str(&format!("  {} - {}\n", pin.id, pin.name));
            output.push_str(&format!(
                "    Center: ({:.6}, {:.6}) | Radius: {}m\n",
                pin.position.lat, pin.position.lng, pin.alert_distance
            ));
            output.push_str(&format!("    Color: {} | Sound: {}\n\n", pin.color, sound));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::test_support::sample_pins;

    #[test]
    fn test_text_format() {
        let output = TextFormatter
            .format(&sample_pins(), &Config::default())
            .unwrap();

        assert!(output.starts_with("Pins (2):"));
        assert!(output.contains("home01 - Home"));
        assert!(output.contains("Radius: 500m"));
        assert!(output.contains("Sound: beep2"));
        assert!(output.contains("Sound: default"));
    }

    #[test]
    fn test_text_empty() {
        let output = TextFormatter.format(&[], &Config::default()).unwrap();
        assert_eq!(output, "No pins.\n");
    }
}
