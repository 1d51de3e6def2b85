//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::coord::{Coordinates, UserPosition};
use crate::error::Error;
use crate::format::{available_formats, FormatInfo};
use crate::pin::{available_sounds, AlertSound, Pin, PinId, PinPatch, ToneSettings};
use crate::server::state::AppState;
use crate::tracker::{ActiveAlert, AlertTransition};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/pins", get(list_pins_handler).post(create_pin_handler))
        .route(
            "/api/pins/:id",
            get(get_pin_handler)
                .patch(update_pin_handler)
                .delete(delete_pin_handler),
        )
        .route("/api/pins/:id/position", put(move_pin_handler))
        .route("/api/placement", post(placement_handler))
        .route(
            "/api/position",
            post(set_position_handler).delete(clear_position_handler),
        )
        .route("/api/alerts", get(alerts_handler))
        .route("/api/sounds", get(sounds_handler))
        .route("/api/formats", get(formats_handler))
        .fallback_service(ServeDir::new(static_dir()).append_index_html_on_directories(true))
        .with_state(state)
}

/// Static front-end directory: `./static`, else next to the executable
fn static_dir() -> PathBuf {
    let local = PathBuf::from("static");
    if local.exists() {
        return local;
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
        .filter(|path| path.exists())
        .unwrap_or(local)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "INVALID_PIN" | "INVALID_COORDINATES" => StatusCode::BAD_REQUEST,
            "OVERLAP_VIOLATION" => StatusCode::CONFLICT,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidPin(_) => "INVALID_PIN",
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::OverlapViolation(_) => "OVERLAP_VIOLATION",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Storage(_) => "STORAGE_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Number of pins
    pub pins: usize,
    /// Number of pins currently alerting
    pub active_alerts: usize,
    /// Whether a user position is known
    pub has_position: bool,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let tracker = state.tracker().await;

    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        pins: tracker.len(),
        active_alerts: tracker.active_alerts().len(),
        has_position: tracker.user_position().is_some(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Pin list response
#[derive(Debug, Serialize, Deserialize)]
pub struct PinsResponse {
    pub pins: Vec<Pin>,
}

/// List pins in insertion order
///
/// GET /api/pins
async fn list_pins_handler(State(state): State<Arc<AppState>>) -> Json<PinsResponse> {
    let tracker = state.tracker().await;
    Json(PinsResponse {
        pins: tracker.pins().to_vec(),
    })
}

/// Create pin request body
///
/// Omitted attributes fall back to the `[pins]` config section.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePinRequest {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
    pub color: Option<String>,
    pub alert_distance: Option<u32>,
    pub alert_sound: Option<AlertSound>,
}

/// Create a pin
///
/// POST /api/pins
async fn create_pin_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePinRequest>,
) -> Result<(StatusCode, Json<Pin>), ApiError> {
    let mut spec = {
        let config = state.config.read().await;
        config.new_pin(Coordinates::new(req.lat, req.lng), req.name)
    };

    if let Some(color) = req.color {
        spec = spec.with_color(color);
    }
    if let Some(meters) = req.alert_distance {
        spec = spec.with_alert_distance(meters);
    }
    if let Some(sound) = req.alert_sound {
        spec = spec.with_sound(sound);
    }

    let pin = state.tracker().await.add_pin(spec)?;
    Ok((StatusCode::CREATED, Json(pin)))
}

/// Get a single pin
///
/// GET /api/pins/:id
async fn get_pin_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Pin>, ApiError> {
    let tracker = state.tracker().await;
    tracker
        .pin(&PinId::from(id.as_str()))
        .cloned()
        .map(Json)
        .ok_or_else(|| Error::NotFound(id).into())
}

/// Edit a pin's attributes
///
/// PATCH /api/pins/:id
async fn update_pin_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<PinPatch>,
) -> Result<Json<Pin>, ApiError> {
    let pin = state
        .tracker()
        .await
        .update_pin(&PinId::from(id), patch)?;
    Ok(Json(pin))
}

/// Delete a pin
///
/// DELETE /api/pins/:id
async fn delete_pin_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.tracker().await.remove_pin(&PinId::from(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Move a pin
///
/// PUT /api/pins/:id/position
async fn move_pin_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(position): Json<Coordinates>,
) -> Result<Json<Pin>, ApiError> {
    let pin = state
        .tracker()
        .await
        .move_pin(&PinId::from(id), position)?;
    Ok(Json(pin))
}

/// Placement check request
#[derive(Debug, Deserialize)]
pub struct PlacementRequest {
    pub lat: f64,
    pub lng: f64,
    /// Radius of the prospective geofence; omitted checks the center only
    pub radius: Option<u32>,
    /// Pin to ignore, e.g. the one being moved
    pub exclude: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlacementResponse {
    pub allowed: bool,
}

/// Check whether a location is free for a pin
///
/// POST /api/placement
async fn placement_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlacementRequest>,
) -> Result<Json<PlacementResponse>, ApiError> {
    let candidate = Coordinates::new(req.lat, req.lng);
    candidate.validate()?;

    let exclude = req.exclude.map(PinId::from);
    let tracker = state.tracker().await;

    let allowed = match req.radius {
        Some(radius) => tracker.can_place_geofence(candidate, radius, exclude.as_ref()),
        None => tracker.can_place_pin(candidate, exclude.as_ref()),
    };

    Ok(Json(PlacementResponse { allowed }))
}

/// Transitions caused by a position change
#[derive(Debug, Serialize, Deserialize)]
pub struct TransitionsResponse {
    pub transitions: Vec<AlertTransition>,
}

/// Report the user's position
///
/// POST /api/position
async fn set_position_handler(
    State(state): State<Arc<AppState>>,
    Json(position): Json<UserPosition>,
) -> Result<Json<TransitionsResponse>, ApiError> {
    position.coords.validate()?;
    let transitions = state.tracker().await.set_user_position(position);
    Ok(Json(TransitionsResponse { transitions }))
}

/// Forget the user's position
///
/// DELETE /api/position
async fn clear_position_handler(State(state): State<Arc<AppState>>) -> Json<TransitionsResponse> {
    let transitions = state.tracker().await.clear_user_position();
    Json(TransitionsResponse { transitions })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AlertsResponse {
    pub alerts: Vec<ActiveAlert>,
}

/// Active alerts in pin order
///
/// GET /api/alerts
async fn alerts_handler(State(state): State<Arc<AppState>>) -> Json<AlertsResponse> {
    let tracker = state.tracker().await;
    Json(AlertsResponse {
        alerts: tracker.active_alert_list().into_iter().cloned().collect(),
    })
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundInfo {
    pub name: AlertSound,
    pub description: String,
    pub tone: ToneSettings,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SoundsResponse {
    pub sounds: Vec<SoundInfo>,
}

/// List alert tones
///
/// GET /api/sounds
async fn sounds_handler() -> Json<SoundsResponse> {
    let sounds = available_sounds()
        .into_iter()
        .map(|s| SoundInfo {
            name: s,
            description: s.description().to_string(),
            tone: s.tone(),
        })
        .collect();

    Json(SoundsResponse { sounds })
}

/// Formats list response
#[derive(Debug, Serialize, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// List available export formats
///
/// GET /api/formats
async fn formats_handler() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: available_formats(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStore;
    use crate::tracker::GeofenceTracker;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn create_test_app() -> (Router, MemoryStore) {
        let store = MemoryStore::new();
        let tracker = GeofenceTracker::new().with_store(Box::new(store.clone()));
        let state = Arc::new(AppState::new(Config::default(), tracker));
        (create_router(state), store)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header("Content-Type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_pin(app: &Router, lat: f64, lng: f64, name: &str) -> Pin {
        let (status, body) = send(
            app,
            "POST",
            "/api/pins",
            Some(json!({ "lat": lat, "lng": lng, "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let (app, _) = create_test_app();

        let (status, body) = send(&app, "GET", "/api/status", None).await;
        assert_eq!(status, StatusCode::OK);

        let status: StatusResponse = serde_json::from_value(body).unwrap();
        assert!(status.running);
        assert_eq!(status.pins, 0);
        assert!(!status.has_position);
    }

    #[tokio::test]
    async fn test_create_pin_uses_config_defaults() {
        let (app, store) = create_test_app();

        let pin = create_pin(&app, 40.7128, -74.0060, "Home").await;
        assert_eq!(pin.alert_distance, 500);
        assert_eq!(pin.color, "red");
        assert_eq!(pin.alert_sound, Some(AlertSound::Beep1));
        assert_eq!(store.records().len(), 1);

        let (_, body) = send(&app, "GET", "/api/pins", None).await;
        let list: PinsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(list.pins, vec![pin]);
    }

    #[tokio::test]
    async fn test_create_pin_blank_name() {
        let (app, _) = create_test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/pins",
            Some(json!({ "lat": 40.0, "lng": -74.0, "name": "  " })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(err.code, "INVALID_PIN");
    }

    #[tokio::test]
    async fn test_create_pin_invalid_coordinates() {
        let (app, _) = create_test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/pins",
            Some(json!({ "lat": 91.0, "lng": -74.0, "name": "North" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(err.code, "INVALID_COORDINATES");
    }

    #[tokio::test]
    async fn test_create_overlapping_pin_conflicts() {
        let (app, store) = create_test_app();
        create_pin(&app, 40.7128, -74.0060, "Home").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/pins",
            Some(json!({ "lat": 40.7130, "lng": -74.0061, "name": "Too close" })),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        let err: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(err.code, "OVERLAP_VIOLATION");
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn test_get_update_delete_pin() {
        let (app, store) = create_test_app();
        let pin = create_pin(&app, 40.7128, -74.0060, "Home").await;
        let uri = format!("/api/pins/{}", pin.id);

        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let fetched: Pin = serde_json::from_value(body).unwrap();
        assert_eq!(fetched, pin);

        let (status, body) = send(
            &app,
            "PATCH",
            &uri,
            Some(json!({ "name": "Office", "alertDistance": 250 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let updated: Pin = serde_json::from_value(body).unwrap();
        assert_eq!(updated.name, "Office");
        assert_eq!(updated.alert_distance, 250);
        assert_eq!(updated.position, pin.position);

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);
        assert!(store.records().is_empty());

        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_api_uses_camel_case_keys() {
        let (app, _) = create_test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/pins",
            Some(json!({ "lat": 40.7128, "lng": -74.0060, "name": "Home", "alertDistance": 300, "alertSound": "beep3" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["alertDistance"], 300);
        assert_eq!(body["alertSound"], "beep3");
        assert!(body.get("alert_distance").is_none());

        let id = body["id"].as_str().unwrap().to_string();
        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/pins/{}", id),
            Some(json!({ "alertSound": "beep2" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alertSound"], "beep2");

        let (_, body) = send(&app, "GET", "/api/status", None).await;
        assert_eq!(body["activeAlerts"], 0);
        assert_eq!(body["hasPosition"], false);
    }

    #[tokio::test]
    async fn test_update_radius_below_minimum() {
        let (app, _) = create_test_app();
        let pin = create_pin(&app, 40.7128, -74.0060, "Home").await;

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/pins/{}", pin.id),
            Some(json!({ "alertDistance": 50 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(err.code, "INVALID_PIN");
    }

    #[tokio::test]
    async fn test_delete_unknown_pin() {
        let (app, _) = create_test_app();

        let (status, body) = send(&app, "DELETE", "/api/pins/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let err: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(err.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_move_pin() {
        let (app, _) = create_test_app();
        let home = create_pin(&app, 40.7128, -74.0060, "Home").await;
        let work = create_pin(&app, 40.7580, -73.9855, "Work").await;

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/pins/{}/position", home.id),
            Some(json!({ "lat": 40.7000, "lng": -74.0100 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let moved: Pin = serde_json::from_value(body).unwrap();
        assert!((moved.position.lat - 40.7).abs() < 1e-9);
        assert!((moved.position.lng + 74.01).abs() < 1e-9);

        // onto the other pin
        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/pins/{}/position", home.id),
            Some(json!({ "lat": work.position.lat, "lng": work.position.lng })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_placement_check() {
        let (app, _) = create_test_app();
        let home = create_pin(&app, 40.7128, -74.0060, "Home").await;

        let (_, body) = send(
            &app,
            "POST",
            "/api/placement",
            Some(json!({ "lat": 40.7130, "lng": -74.0061 })),
        )
        .await;
        assert_eq!(body, json!({ "allowed": false }));

        let (_, body) = send(
            &app,
            "POST",
            "/api/placement",
            Some(json!({ "lat": 40.7130, "lng": -74.0061, "exclude": home.id.as_str() })),
        )
        .await;
        assert_eq!(body, json!({ "allowed": true }));

        // 0.01 deg of latitude is about 1.1km: clear of the 500m radius,
        // but a 2km geofence there would swallow Home's center
        let (_, body) = send(
            &app,
            "POST",
            "/api/placement",
            Some(json!({ "lat": 40.7228, "lng": -74.0060 })),
        )
        .await;
        assert_eq!(body, json!({ "allowed": true }));

        let (_, body) = send(
            &app,
            "POST",
            "/api/placement",
            Some(json!({ "lat": 40.7228, "lng": -74.0060, "radius": 2000 })),
        )
        .await;
        assert_eq!(body, json!({ "allowed": false }));
    }

    #[tokio::test]
    async fn test_position_transitions_and_alerts() {
        let (app, _) = create_test_app();
        let home = create_pin(&app, 40.7128, -74.0060, "Home").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/position",
            Some(json!({ "lat": 40.7129, "lng": -74.0060, "accuracy": 10.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let resp: TransitionsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.transitions, vec![AlertTransition::Entered(home.clone())]);

        let (_, body) = send(&app, "GET", "/api/alerts", None).await;
        let alerts: AlertsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(alerts.alerts.len(), 1);
        assert_eq!(alerts.alerts[0].pin_id, home.id);

        // same position again: nothing new
        let (_, body) = send(
            &app,
            "POST",
            "/api/position",
            Some(json!({ "lat": 40.7129, "lng": -74.0060, "accuracy": 10.0 })),
        )
        .await;
        assert_eq!(body["transitions"], json!([]));

        let (status, body) = send(&app, "DELETE", "/api/position", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["transitions"][0]["type"], "exited");

        let (_, body) = send(&app, "GET", "/api/alerts", None).await;
        assert_eq!(body["alerts"], json!([]));
    }

    #[tokio::test]
    async fn test_position_invalid_coordinates() {
        let (app, _) = create_test_app();

        let (status, body) = send(
            &app,
            "POST",
            "/api/position",
            Some(json!({ "lat": 0.0, "lng": 200.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_COORDINATES");
    }

    #[tokio::test]
    async fn test_sounds_endpoint() {
        let (app, _) = create_test_app();

        let (status, body) = send(&app, "GET", "/api/sounds", None).await;
        assert_eq!(status, StatusCode::OK);

        let sounds: SoundsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(sounds.sounds.len(), 4);
        assert_eq!(sounds.sounds[0].name, AlertSound::Beep1);
        assert_eq!(sounds.sounds[0].tone.frequency_hz, 800);
    }

    #[tokio::test]
    async fn test_formats_endpoint() {
        let (app, _) = create_test_app();

        let (status, body) = send(&app, "GET", "/api/formats", None).await;
        assert_eq!(status, StatusCode::OK);

        let formats: FormatsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(formats.formats.len(), 4);
    }
}
