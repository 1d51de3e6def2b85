//! Centralized constants for the pinwatch crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters (spherical approximation used by map SDKs)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
}

/// Pin limits
pub mod pin {
    /// Smallest accepted alert radius in meters
    pub const MIN_ALERT_DISTANCE: u32 = 100;
}

/// Storage locations
pub mod storage {
    /// Application directory name (for XDG paths)
    pub const APP_DIR_NAME: &str = "pinwatch";

    /// Pin collection file name inside the data directory
    pub const PINS_FILE_NAME: &str = "pins.json";
}
