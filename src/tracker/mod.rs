//! Geofence tracker
//!
//! Owns the pins, the last known user position and the set of pins whose
//! alert is currently active. Every mutation re-evaluates membership over all
//! pins and reports `Entered`/`Exited` transitions.
//!
//! ## Invariants
//! - The active set is exactly the pins whose geofence contains the last
//!   user position (empty when there is no position).
//! - Pins added, moved or resized through the tracker never overlap: each
//!   pin's center lies strictly outside the other's radius. Restored pins
//!   only have to sit outside the geofences restored before them.
//! - A rejected operation leaves the tracker untouched.
//!
//! The tracker is synchronous and single-owner. Callers that share it across
//! tasks wrap it in one mutex.


use crate::alert::AlertSink;
use crate::coord::{Coordinates, UserPosition};
use crate::error::{Error, Result};
use crate::pin::{validate_alert_distance, validate_name, NewPin, Pin, PinId, PinPatch};
use crate::store::{PinRecord, PinStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// A change in alert membership for one pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "pin", rename_all = "snake_case")]
pub enum AlertTransition {
    /// The user moved into the pin's geofence
    Entered(Pin),
    /// The user left the geofence, or the pin went away while alerting
    Exited(Pin),
}

impl AlertTransition {
    pub fn pin(&self) -> &Pin {
        match self {
            Self::Entered(pin) | Self::Exited(pin) => pin,
        }
    }

    pub fn pin_id(&self) -> &PinId {
        &self.pin().id
    }

    pub fn is_entered(&self) -> bool {
        matches!(self, Self::Entered(_))
    }
}

/// Metadata for a pin whose alert is active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveAlert {
    pub pin_id: PinId,
    pub activated_at: DateTime<Utc>,
    /// Distance from the pin center when the alert started
    pub distance_meters: f64,
}

/// Pin collection plus proximity-alert state
pub struct GeofenceTracker {
    pins: Vec<Pin>,
    user_position: Option<UserPosition>,
    active: HashMap<PinId, ActiveAlert>,
    store: Option<Box<dyn PinStore>>,
    sinks: Vec<Box<dyn AlertSink>>,
    /// Stored records that could not be restored; written back on every save
    held_back: Vec<PinRecord>,
}

impl std::fmt::Debug for GeofenceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeofenceTracker")
            .field("pins", &self.pins)
            .field("user_position", &self.user_position)
            .field("active", &self.active)
            .field("store", &self.store.as_ref().map(|s| s.name().to_string()))
            .field("sinks", &self.sinks.len())
            .field("held_back", &self.held_back.len())
            .finish()
    }
}

impl Default for GeofenceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl GeofenceTracker {
    /// Empty tracker with no persistence
    pub fn new() -> Self {
        Self {
            pins: Vec::new(),
            user_position: None,
            active: HashMap::new(),
            store: None,
            sinks: Vec::new(),
            held_back: Vec::new(),
        }
    }

    /// Rebuild a tracker from persisted records, without attaching a store
    ///
    /// Records are restored in order. A record is skipped when it has a blank
    /// name, a radius under the minimum, bad coordinates or a duplicate id, or
    /// when its center lies inside an already restored pin's geofence (the
    /// placement rule the browser app enforces). Skipped records are kept
    /// aside and saved back untouched, so loading never loses stored data.
    pub fn from_records(records: Vec<PinRecord>) -> Self {
        let mut tracker = Self::new();
        for record in records {
            let mut pin = record.clone().into_pin();
            match tracker.check_restored(&pin) {
                Ok(name) => {
                    pin.name = name;
                    tracker.pins.push(pin);
                }
                Err(e) => {
                    warn!("Skipping stored pin {}: {}", pin.id, e);
                    tracker.held_back.push(record);
                }
            }
        }
        debug!("Restored {} pins", tracker.pins.len());
        tracker
    }

    /// Load pins from `store` and keep saving to it after every change
    pub fn load(store: Box<dyn PinStore>) -> Result<Self> {
        let records = store.load()?;
        info!("Loaded {} pin records from {} store", records.len(), store.name());
        let mut tracker = Self::from_records(records);
        tracker.store = Some(store);
        Ok(tracker)
    }

    /// Attach a store without loading from it
    pub fn with_store(mut self, store: Box<dyn PinStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Register a receiver for every future transition
    pub fn subscribe(&mut self, sink: Box<dyn AlertSink>) {
        self.sinks.push(sink);
    }

    fn check_restored(&self, pin: &Pin) -> Result<String> {
        let name = validate_name(&pin.name)?;
        validate_alert_distance(pin.alert_distance)?;
        pin.position.validate()?;
        if self.index_of(&pin.id).is_some() {
            return Err(Error::InvalidPin(format!("duplicate id {}", pin.id)));
        }
        if let Some(other) = self.pins.iter().find(|p| p.contains(pin.position)) {
            return Err(overlap_error(pin.position, other));
        }
        Ok(name)
    }

    // ---- placement ----

    /// Whether `candidate` lies outside every existing pin's geofence
    ///
    /// The pin named by `excluding` is ignored, so a pin can be checked
    /// against its own drag target. The boundary counts as inside.
    pub fn can_place_pin(&self, candidate: Coordinates, excluding: Option<&PinId>) -> bool {
        self.pins
            .iter()
            .filter(|p| Some(&p.id) != excluding)
            .all(|p| !p.contains(candidate))
    }

    /// Whether a geofence of `radius` meters at `candidate` keeps the
    /// no-overlap invariant with every other pin, in both directions
    pub fn can_place_geofence(
        &self,
        candidate: Coordinates,
        radius: u32,
        excluding: Option<&PinId>,
    ) -> bool {
        self.find_conflict(candidate, radius, excluding).is_none()
    }

    /// First pin (in insertion order) that a geofence at `candidate` would overlap
    fn find_conflict(
        &self,
        candidate: Coordinates,
        radius: u32,
        excluding: Option<&PinId>,
    ) -> Option<&Pin> {
        self.pins
            .iter()
            .filter(|p| Some(&p.id) != excluding)
            .find(|p| {
                let d = p.distance_to(candidate);
                d <= f64::from(p.alert_distance) || d <= f64::from(radius)
            })
    }

    // ---- pin lifecycle ----

    /// Create a pin
    ///
    /// Fails with `InvalidPin` for a blank name or a radius under 100 m,
    /// `InvalidCoordinates` for an out-of-range position and
    /// `OverlapViolation` when the geofence would overlap another pin.
    pub fn add_pin(&mut self, spec: NewPin) -> Result<Pin> {
        let name = spec.validate()?;

        if let Some(other) = self.find_conflict(spec.position, spec.alert_distance, None) {
            return Err(overlap_error(spec.position, other));
        }

        let pin = spec.into_pin(PinId::generate(), name);
        info!(pin_id = %pin.id, name = %pin.name, "Added pin at {}", pin.position);

        self.pins.push(pin.clone());
        self.evaluate();
        self.persist();

        Ok(pin)
    }

    /// Edit name, color, radius or sound. Position is left alone.
    ///
    /// A larger radius that would reach another pin's center is rejected
    /// with `OverlapViolation`.
    pub fn update_pin(&mut self, id: &PinId, patch: PinPatch) -> Result<Pin> {
        let idx = self.require(id)?;

        let name = patch.name.as_deref().map(validate_name).transpose()?;
        if let Some(radius) = patch.alert_distance {
            validate_alert_distance(radius)?;
            let position = self.pins[idx].position;
            if let Some(other) = self.find_conflict(position, radius, Some(id)) {
                return Err(Error::OverlapViolation(format!(
                    "a {}m radius would reach pin '{}'",
                    radius, other.name
                )));
            }
        }

        let pin = &mut self.pins[idx];
        if let Some(name) = name {
            pin.name = name;
        }
        if let Some(color) = patch.color {
            pin.color = color;
        }
        if let Some(radius) = patch.alert_distance {
            pin.alert_distance = radius;
        }
        if let Some(sound) = patch.alert_sound {
            pin.alert_sound = Some(sound);
        }
        let updated = pin.clone();
        info!(pin_id = %updated.id, "Updated pin");

        self.evaluate();
        self.persist();

        Ok(updated)
    }

    /// Move a pin to a new center (drag completion)
    ///
    /// On `OverlapViolation` the stored position is unchanged; the caller
    /// is expected to snap its marker back.
    pub fn move_pin(&mut self, id: &PinId, position: Coordinates) -> Result<Pin> {
        let idx = self.require(id)?;
        position.validate()?;

        let radius = self.pins[idx].alert_distance;
        if let Some(other) = self.find_conflict(position, radius, Some(id)) {
            return Err(overlap_error(position, other));
        }

        let pin = &mut self.pins[idx];
        pin.position = position;
        let moved = pin.clone();
        info!(pin_id = %moved.id, "Moved pin to {}", position);

        self.evaluate();
        self.persist();

        Ok(moved)
    }

    /// Delete a pin, reporting an `Exited` transition first if it was alerting
    pub fn remove_pin(&mut self, id: &PinId) -> Result<Pin> {
        let idx = self.require(id)?;

        if self.active.remove(id).is_some() {
            let transition = AlertTransition::Exited(self.pins[idx].clone());
            self.emit(std::slice::from_ref(&transition));
        }

        let pin = self.pins.remove(idx);
        info!(pin_id = %pin.id, name = %pin.name, "Removed pin");
        self.persist();

        Ok(pin)
    }

    // ---- location ----

    /// Record a new location fix and report membership changes
    ///
    /// Transitions come back in pin insertion order. Repeating the same
    /// position yields nothing.
    pub fn set_user_position(&mut self, position: UserPosition) -> Vec<AlertTransition> {
        self.user_position = Some(position);
        self.evaluate()
    }

    /// Forget the location (provider lost its fix); every active alert exits
    pub fn clear_user_position(&mut self) -> Vec<AlertTransition> {
        self.user_position = None;

        let transitions: Vec<AlertTransition> = self
            .pins
            .iter()
            .filter(|p| self.active.contains_key(&p.id))
            .map(|p| AlertTransition::Exited(p.clone()))
            .collect();
        self.active.clear();

        self.emit(&transitions);
        transitions
    }

    /// Recompute membership for every pin against the stored position
    fn evaluate(&mut self) -> Vec<AlertTransition> {
        let Some(position) = self.user_position else {
            return Vec::new();
        };

        let now = Utc::now();
        let mut transitions = Vec::new();

        for pin in &self.pins {
            let distance = pin.distance_to(position.coords);
            let inside = distance <= f64::from(pin.alert_distance);

            match (inside, self.active.contains_key(&pin.id)) {
                (true, false) => {
                    self.active.insert(
                        pin.id.clone(),
                        ActiveAlert {
                            pin_id: pin.id.clone(),
                            activated_at: now,
                            distance_meters: distance,
                        },
                    );
                    transitions.push(AlertTransition::Entered(pin.clone()));
                }
                (false, true) => {
                    self.active.remove(&pin.id);
                    transitions.push(AlertTransition::Exited(pin.clone()));
                }
                _ => {}
            }
        }

        if !transitions.is_empty() {
            debug!(
                "Re-evaluated {} pins: {} transitions, {} active",
                self.pins.len(),
                transitions.len(),
                self.active.len()
            );
        }

        self.emit(&transitions);
        transitions
    }

    fn emit(&mut self, transitions: &[AlertTransition]) {
        for sink in &mut self.sinks {
            for transition in transitions {
                sink.on_transition(transition);
            }
        }
    }

    fn persist(&mut self) {
        let mut records = self.records();
        records.extend(self.held_back.iter().cloned());
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.save(&records) {
                warn!("Failed to save pins to {} store: {}", store.name(), e);
            }
        }
    }

    // ---- queries ----

    fn index_of(&self, id: &PinId) -> Option<usize> {
        self.pins.iter().position(|p| &p.id == id)
    }

    fn require(&self, id: &PinId) -> Result<usize> {
        self.index_of(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// All pins in insertion order
    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn pin(&self, id: &PinId) -> Option<&Pin> {
        self.pins.iter().find(|p| &p.id == id)
    }

    /// Resolve a full id or a unique id prefix
    pub fn resolve_id(&self, prefix: &str) -> Result<PinId> {
        if prefix.trim().is_empty() {
            return Err(Error::NotFound("empty pin id".to_string()));
        }

        let mut matches = self.pins.iter().filter(|p| p.id.as_str().starts_with(prefix));

        match (matches.next(), matches.next()) {
            (Some(pin), None) => Ok(pin.id.clone()),
            (Some(_), Some(_)) if self.index_of(&PinId::from(prefix)).is_some() => {
                Ok(PinId::from(prefix))
            }
            (Some(_), Some(_)) => Err(Error::NotFound(format!("ambiguous id prefix {}", prefix))),
            (None, _) => Err(Error::NotFound(prefix.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn user_position(&self) -> Option<UserPosition> {
        self.user_position
    }

    /// Snapshot of the pins currently alerting
    pub fn active_alerts(&self) -> HashSet<PinId> {
        self.active.keys().cloned().collect()
    }

    pub fn active_alert(&self, id: &PinId) -> Option<&ActiveAlert> {
        self.active.get(id)
    }

    /// Active alerts in pin insertion order
    pub fn active_alert_list(&self) -> Vec<&ActiveAlert> {
        self.pins
            .iter()
            .filter_map(|p| self.active.get(&p.id))
            .collect()
    }

    pub fn is_alerting(&self, id: &PinId) -> bool {
        self.active.contains_key(id)
    }

    /// The collection in persisted form
    pub fn records(&self) -> Vec<PinRecord> {
        self.pins.iter().map(PinRecord::from).collect()
    }
}

fn overlap_error(candidate: Coordinates, other: &Pin) -> Error {
    Error::OverlapViolation(format!(
        "{} overlaps the alert radius of pin '{}' ({}m)",
        candidate, other.name, other.alert_distance
    ))
}
