//! pinwatch: Geofenced map pins with proximity alerts
//!
//! A library and CLI tool for dropping named pins on the map, each with a
//! circular alert radius, and reporting when the user's position enters or
//! leaves one of them.
//!
//! ## Features
//!
//! - Non-overlapping circular geofences with per-pin radius and alert tone
//! - Enter/exit transitions on every position update or pin change
//! - JSON file persistence in the XDG data directory
//! - Export as JSON, GPX, text or map links
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use pinwatch::{AlertTransition, Coordinates, GeofenceTracker, NewPin, UserPosition};
//!
//! let mut tracker = GeofenceTracker::new();
//! let home = tracker
//!     .add_pin(NewPin::new(Coordinates::new(40.7128, -74.0060), "Home"))
//!     .unwrap();
//!
//! // Walk to within a few meters of the pin
//! let transitions = tracker.set_user_position(UserPosition::at(40.7129, -74.0060));
//! assert_eq!(transitions, vec![AlertTransition::Entered(home.clone())]);
//! assert!(tracker.active_alerts().contains(&home.id));
//!
//! // No room for another pin right next door
//! assert!(!tracker.can_place_pin(Coordinates::new(40.7130, -74.0061), None));
//! ```

pub mod alert;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod pin;
pub mod server;
pub mod store;
pub mod tracker;

// Re-export commonly used types
pub use config::Config;
pub use coord::{Coordinates, UserPosition};
pub use error::{Error, Result};
pub use pin::{AlertSound, NewPin, Pin, PinId, PinPatch};
pub use tracker::{ActiveAlert, AlertTransition, GeofenceTracker};
