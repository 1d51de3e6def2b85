//! Pins: named circular geofences
//!
//! A pin carries only semantic data. Markers, circles and other map handles
//! belong to whatever renders them.

pub mod sound;

pub use sound::{available_sounds, AlertSound, ToneSettings};

use crate::config::defaults::{DEFAULT_ALERT_DISTANCE, DEFAULT_COLOR};
use crate::constants::pin::MIN_ALERT_DISTANCE;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Opaque pin identifier
///
/// Fresh ids are hyphenless UUIDs. Ids read back from storage are kept as-is,
/// whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(String);

impl PinId {
    /// Generate a fresh unique id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PinId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PinId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for PinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named circular geofence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub id: PinId,
    pub position: Coordinates,
    pub name: String,
    pub color: String,

    /// Geofence radius in meters, never below 100
    pub alert_distance: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_sound: Option<AlertSound>,
}

impl Pin {
    /// Distance from the pin's center to `point`, in meters
    pub fn distance_to(&self, point: Coordinates) -> f64 {
        self.position.distance_to(point)
    }

    /// Whether `point` lies inside this pin's geofence (boundary inclusive)
    pub fn contains(&self, point: Coordinates) -> bool {
        self.distance_to(point) <= f64::from(self.alert_distance)
    }

    /// The tone this pin alerts with
    pub fn tone(&self) -> ToneSettings {
        self.alert_sound.unwrap_or_default().tone()
    }
}

/// Everything needed to create a pin, minus the id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPin {
    pub position: Coordinates,
    pub name: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_alert_distance")]
    pub alert_distance: u32,

    #[serde(default)]
    pub alert_sound: Option<AlertSound>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}
fn default_alert_distance() -> u32 {
    DEFAULT_ALERT_DISTANCE
}

impl NewPin {
    /// A red pin with the default radius and no sound
    pub fn new(position: Coordinates, name: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
            color: default_color(),
            alert_distance: default_alert_distance(),
            alert_sound: None,
        }
    }

    pub fn with_alert_distance(mut self, meters: u32) -> Self {
        self.alert_distance = meters;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_sound(mut self, sound: AlertSound) -> Self {
        self.alert_sound = Some(sound);
        self
    }

    /// Check name, radius and position, returning the trimmed name
    pub(crate) fn validate(&self) -> Result<String> {
        let name = validate_name(&self.name)?;
        validate_alert_distance(self.alert_distance)?;
        self.position.validate()?;
        Ok(name)
    }

    /// Turn into a pin with the given id
    pub(crate) fn into_pin(self, id: PinId, name: String) -> Pin {
        Pin {
            id,
            position: self.position,
            name,
            color: self.color,
            alert_distance: self.alert_distance,
            alert_sound: self.alert_sound,
        }
    }
}

/// Edit of a pin's attributes. Position is never part of an edit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_distance: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_sound: Option<AlertSound>,
}

impl PinPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.color.is_none()
            && self.alert_distance.is_none()
            && self.alert_sound.is_none()
    }
}

/// Reject blank names; returns the trimmed name
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidPin("name must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Reject radii under the minimum
pub fn validate_alert_distance(meters: u32) -> Result<()> {
    if meters < MIN_ALERT_DISTANCE {
        return Err(Error::InvalidPin(format!(
            "alert distance {}m is below the minimum of {}m",
            meters, MIN_ALERT_DISTANCE
        )));
    }
    Ok(())
}
