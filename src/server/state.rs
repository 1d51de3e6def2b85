//! Server shared state
//!
//! Holds configuration and the tracker shared by all HTTP handlers.

use crate::config::Config;
use crate::tracker::GeofenceTracker;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, MutexGuard, RwLock};

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Arc<RwLock<Config>>,

    /// The tracker; every request goes through this lock
    tracker: Mutex<GeofenceTracker>,

    started_at: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, tracker: GeofenceTracker) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            tracker: Mutex::new(tracker),
            started_at: Instant::now(),
        }
    }

    /// Lock the tracker for the duration of one operation
    pub async fn tracker(&self) -> MutexGuard<'_, GeofenceTracker> {
        self.tracker.lock().await
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
