//! Alert tones
//!
//! The tracker never plays anything. These settings are handed to whatever
//! presentation layer turns an `Entered` transition into a repeating beep.

use serde::{Deserialize, Serialize};

/// Selectable alert tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSound {
    /// Fast, high beep
    #[default]
    Beep1,
    /// Medium beep
    Beep2,
    /// Slow, low beep
    Beep3,
    /// Very fast, very high beep
    Beep4,
}

/// How one alert tone sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneSettings {
    /// Square wave frequency
    pub frequency_hz: u32,
    /// Length of a single beep
    pub duration_ms: u32,
    /// Time between beep starts while the alert is active
    pub interval_ms: u32,
}

impl AlertSound {
    pub fn tone(self) -> ToneSettings {
        let (frequency_hz, duration_ms, interval_ms) = match self {
            Self::Beep1 => (800, 200, 300),
            Self::Beep2 => (600, 300, 500),
            Self::Beep3 => (400, 400, 700),
            Self::Beep4 => (1000, 100, 200),
        };
        ToneSettings {
            frequency_hz,
            duration_ms,
            interval_ms,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Beep1 => "Fast beep",
            Self::Beep2 => "Medium beep",
            Self::Beep3 => "Slow beep",
            Self::Beep4 => "Very fast beep",
        }
    }
}

impl std::fmt::Display for AlertSound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Beep1 => write!(f, "beep1"),
            Self::Beep2 => write!(f, "beep2"),
            Self::Beep3 => write!(f, "beep3"),
            Self::Beep4 => write!(f, "beep4"),
        }
    }
}

impl std::str::FromStr for AlertSound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beep1" => Ok(Self::Beep1),
            "beep2" => Ok(Self::Beep2),
            "beep3" => Ok(Self::Beep3),
            "beep4" => Ok(Self::Beep4),
            _ => Err(format!("Unknown alert sound: {}", s)),
        }
    }
}

/// List all available alert sounds
pub fn available_sounds() -> Vec<AlertSound> {
    vec![
        AlertSound::Beep1,
        AlertSound::Beep2,
        AlertSound::Beep3,
        AlertSound::Beep4,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_table() {
        assert_eq!(AlertSound::Beep1.tone().frequency_hz, 800);
        assert_eq!(AlertSound::Beep3.tone().interval_ms, 700);
        assert_eq!(AlertSound::Beep4.tone().duration_ms, 100);
    }

    #[test]
    fn test_parse_and_display_agree() {
        for sound in available_sounds() {
            assert_eq!(sound.to_string().parse::<AlertSound>().unwrap(), sound);
        }
        assert!("siren".parse::<AlertSound>().is_err());
        assert_eq!("BEEP2".parse::<AlertSound>().unwrap(), AlertSound::Beep2);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&AlertSound::Beep3).unwrap(), "\"beep3\"");
    }
}
