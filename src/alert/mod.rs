//! Alert sinks
//!
//! Whatever reacts to geofence transitions (sound, notifications, marker
//! animation) subscribes to the tracker through `AlertSink`. Sinks own all
//! side effects; the tracker only reports membership changes.

use crate::tracker::AlertTransition;
use tracing::info;

/// Receiver of enter/exit transitions
pub trait AlertSink: Send {
    fn on_transition(&mut self, transition: &AlertTransition);
}

/// Prints a notification line per transition to stdout
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// The line printed for a transition
    pub fn message(transition: &AlertTransition) -> String {
        match transition {
            AlertTransition::Entered(pin) => {
                let tone = pin.tone();
                format!(
                    "Alert: You are near {}! [{} {}Hz every {}ms]",
                    pin.name,
                    pin.alert_sound.unwrap_or_default(),
                    tone.frequency_hz,
                    tone.interval_ms
                )
            }
            AlertTransition::Exited(pin) => format!("Left {}", pin.name),
        }
    }
}

impl AlertSink for ConsoleSink {
    fn on_transition(&mut self, transition: &AlertTransition) {
        println!("{}", Self::message(transition));
    }
}

/// Reports transitions through `tracing`
#[derive(Debug, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn on_transition(&mut self, transition: &AlertTransition) {
        let pin = transition.pin();
        match transition {
            AlertTransition::Entered(_) => {
                info!(pin_id = %pin.id, name = %pin.name, "Entered geofence")
            }
            AlertTransition::Exited(_) => {
                info!(pin_id = %pin.id, name = %pin.name, "Exited geofence")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;
    use crate::pin::{AlertSound, Pin, PinId};

    fn pin(sound: Option<AlertSound>) -> Pin {
        Pin {
            id: PinId::from("p1"),
            position: Coordinates::new(0.0, 0.0),
            name: "Bakery".to_string(),
            color: "red".to_string(),
            alert_distance: 200,
            alert_sound: sound,
        }
    }

    #[test]
    fn test_enter_message() {
        let msg = ConsoleSink::message(&AlertTransition::Entered(pin(Some(AlertSound::Beep3))));
        assert_eq!(msg, "Alert: You are near Bakery! [beep3 400Hz every 700ms]");
    }

    #[test]
    fn test_enter_message_default_tone() {
        let msg = ConsoleSink::message(&AlertTransition::Entered(pin(None)));
        assert!(msg.contains("beep1 800Hz"));
    }

    #[test]
    fn test_exit_message() {
        let msg = ConsoleSink::message(&AlertTransition::Exited(pin(None)));
        assert_eq!(msg, "Left Bakery");
    }
}
