//! Pin persistence
//!
//! The tracker hands its whole collection to a `PinStore` after every
//! successful change and reads it back at startup. Records use the layout the
//! browser app keeps in its cookie, so either side can read the other's data.

pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::coord::Coordinates;
use crate::error::Result;
use crate::pin::{AlertSound, Pin, PinId};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Persisted form of a pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRecord {
    pub id: String,
    pub position: Coordinates,
    pub name: String,

    #[serde(default = "default_color")]
    pub color: String,

    pub alert_distance: u32,

    /// Kept as free text so an unknown tone doesn't make the whole file unreadable
    #[serde(default)]
    pub alert_sound: Option<String>,
}

fn default_color() -> String {
    crate::config::defaults::DEFAULT_COLOR.to_string()
}

impl From<&Pin> for PinRecord {
    fn from(pin: &Pin) -> Self {
        Self {
            id: pin.id.to_string(),
            position: pin.position,
            name: pin.name.clone(),
            color: pin.color.clone(),
            alert_distance: pin.alert_distance,
            alert_sound: pin.alert_sound.map(|s| s.to_string()),
        }
    }
}

impl PinRecord {
    /// Convert back into a pin. Name and radius are checked by the tracker.
    pub fn into_pin(self) -> Pin {
        let alert_sound = self.alert_sound.as_deref().and_then(|s| {
            s.parse::<AlertSound>()
                .map_err(|e| warn!("Pin {}: {}, using default tone", self.id, e))
                .ok()
        });

        Pin {
            id: PinId::from(self.id),
            position: self.position,
            name: self.name,
            color: self.color,
            alert_distance: self.alert_distance,
            alert_sound,
        }
    }
}

/// Durable storage for the pin collection
pub trait PinStore: Send {
    /// Short name for log lines
    fn name(&self) -> &str;

    /// Read all stored records in their saved order
    fn load(&self) -> Result<Vec<PinRecord>>;

    /// Replace the stored collection
    fn save(&mut self, records: &[PinRecord]) -> Result<()>;
}
