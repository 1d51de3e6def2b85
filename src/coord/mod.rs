//! Geographic coordinates and distance
//!
//! This module handles:
//! - Latitude/longitude pairs and their validation
//! - The device location reported by a location provider
//! - Great-circle distance for geofence tests

pub mod distance;

pub use distance::{haversine_distance, is_in_circle};

use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Distance to another coordinate in meters
    pub fn distance_to(&self, other: Coordinates) -> f64 {
        haversine_distance(*self, other)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// Current device location as delivered by a location provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserPosition {
    #[serde(flatten)]
    pub coords: Coordinates,

    /// Accuracy radius in meters
    #[serde(default)]
    pub accuracy: f64,
}

impl UserPosition {
    pub fn new(coords: Coordinates, accuracy: f64) -> Self {
        Self { coords, accuracy }
    }

    /// A fix with unknown accuracy
    pub fn at(lat: f64, lng: f64) -> Self {
        Self::new(Coordinates::new(lat, lng), 0.0)
    }
}

impl std::str::FromStr for UserPosition {
    type Err = String;

    /// Parse `lat,lng` or `lat,lng,accuracy`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();

        let parse = |v: &str, what: &str| {
            v.parse::<f64>()
                .map_err(|_| format!("Invalid {}: {}", what, v))
        };

        match parts.as_slice() {
            [lat, lng] => Ok(Self::at(parse(lat, "latitude")?, parse(lng, "longitude")?)),
            [lat, lng, accuracy] => Ok(Self::new(
                Coordinates::new(parse(lat, "latitude")?, parse(lng, "longitude")?),
                parse(accuracy, "accuracy")?,
            )),
            _ => Err(format!("Expected 'lat,lng[,accuracy]', got: {}", s)),
        }
    }
}
