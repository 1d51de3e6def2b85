//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/pinwatch/config.toml

pub mod defaults;

use crate::constants::pin::MIN_ALERT_DISTANCE;
use crate::constants::storage::APP_DIR_NAME;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::pin::{AlertSound, NewPin};
use crate::store::JsonFileStore;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Defaults applied to new pins
    #[serde(default)]
    pub pins: PinDefaultsConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Where pins are stored
    #[serde(default)]
    pub storage: StorageConfig,

    /// URL generation settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Defaults applied to new pins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinDefaultsConfig {
    /// Alert radius in meters
    #[serde(default = "default_alert_distance")]
    pub alert_distance: u32,

    /// Pin color
    #[serde(default = "default_color")]
    pub color: String,

    /// Alert tone
    #[serde(default = "default_sound")]
    pub sound: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Pins file; empty means the XDG data directory
    #[serde(default)]
    pub pins_file: String,
}

/// URL generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

// Default value functions for serde
fn default_alert_distance() -> u32 {
    DEFAULT_ALERT_DISTANCE
}
fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}
fn default_sound() -> String {
    DEFAULT_SOUND.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/search/?api=1&query={lat},{lng}".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map=17/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}&q={name}".to_string(),
    );
    providers
}

impl Default for PinDefaultsConfig {
    fn default() -> Self {
        Self {
            alert_distance: default_alert_distance(),
            color: default_color(),
            sound: default_sound(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["pins", "alert_distance"] => Some(self.pins.alert_distance.to_string()),
            ["pins", "color"] => Some(self.pins.color.clone()),
            ["pins", "sound"] => Some(self.pins.sound.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["storage", "pins_file"] => Some(self.storage.pins_file.clone()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["pins", "alert_distance"] => {
                let meters: u32 = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid alert distance value: {}", value))
                })?;
                if meters < MIN_ALERT_DISTANCE {
                    return Err(Error::Config(format!(
                        "Alert distance must be at least {}m",
                        MIN_ALERT_DISTANCE
                    )));
                }
                self.pins.alert_distance = meters;
            }
            ["pins", "color"] => {
                self.pins.color = value.to_string();
            }
            ["pins", "sound"] => {
                let sound: AlertSound = value.parse().map_err(Error::Config)?;
                self.pins.sound = sound.to_string();
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid port value: {}", value))
                })?;
            }

            ["storage", "pins_file"] => {
                self.storage.pins_file = value.to_string();
            }

            ["url", "default"] => {
                if !self.url.providers.contains_key(value) {
                    return Err(Error::Config(format!("Unknown URL provider: {}", value)));
                }
                self.url.default = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "pins.alert_distance",
            "pins.color",
            "pins.sound",
            "server.host",
            "server.port",
            "storage.pins_file",
            "url.default",
        ]
    }

    /// Configured default alert tone, if it names a known sound
    pub fn default_sound(&self) -> Option<AlertSound> {
        self.pins.sound.parse().ok()
    }

    /// Start a new pin with the configured color, radius and sound
    pub fn new_pin(&self, position: Coordinates, name: impl Into<String>) -> NewPin {
        let spec = NewPin::new(position, name)
            .with_alert_distance(self.pins.alert_distance)
            .with_color(self.pins.color.clone());

        match self.default_sound() {
            Some(sound) => spec.with_sound(sound),
            None => spec,
        }
    }

    /// Path of the pins file
    pub fn pins_path(&self) -> Result<PathBuf> {
        if self.storage.pins_file.is_empty() {
            JsonFileStore::default_path()
        } else {
            Ok(PathBuf::from(&self.storage.pins_file))
        }
    }

    /// Open the configured pin store
    pub fn pin_store(&self) -> Result<JsonFileStore> {
        Ok(JsonFileStore::new(self.pins_path()?))
    }

    /// Format a URL using the specified provider
    ///
    /// Replaces {lat}, {lng} and {name} placeholders; the name is URL-encoded
    pub fn format_url(
        &self,
        provider: Option<&str>,
        position: Coordinates,
        name: &str,
    ) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &position.lat.to_string())
            .replace("{lng}", &position.lng.to_string())
            .replace("{name}", &urlencoding::encode(name)))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    fn with_temp_config<F: FnOnce()>(f: F) {
        let temp_dir = TempDir::new().unwrap();
        env::set_var("XDG_CONFIG_HOME", temp_dir.path());
        f();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.pins.alert_distance, 500);
        assert_eq!(config.pins.color, "red");
        assert_eq!(config.pins.sound, "beep1");
        assert_eq!(config.server.port, 7979);
        assert!(config.storage.pins_file.is_empty());
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("pins.color"), Some("red".to_string()));

        config.set("pins.color", "blue").unwrap();
        assert_eq!(config.get("pins.color"), Some("blue".to_string()));

        config.set("pins.alert_distance", "750").unwrap();
        assert_eq!(config.pins.alert_distance, 750);

        config.set("pins.sound", "BEEP3").unwrap();
        assert_eq!(config.get("pins.sound"), Some("beep3".to_string()));
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("pins.alert_distance", "not_a_number").is_err());
        assert!(config.set("pins.alert_distance", "99").is_err());
        assert!(config.set("pins.sound", "foghorn").is_err());
        assert!(config.set("url.default", "mapquest").is_err());
        assert_eq!(config.pins.alert_distance, 500);
    }

    #[test]
    fn test_new_pin_uses_defaults() {
        let mut config = Config::default();
        config.set("pins.color", "green").unwrap();
        config.set("pins.sound", "beep2").unwrap();

        let spec = config.new_pin(Coordinates::new(1.0, 2.0), "Shop");
        assert_eq!(spec.color, "green");
        assert_eq!(spec.alert_distance, 500);
        assert_eq!(spec.alert_sound, Some(AlertSound::Beep2));
    }

    #[test]
    fn test_format_url() {
        let config = Config::default();
        let position = Coordinates::new(40.7128, -74.0060);

        let url = config.format_url(Some("google"), position, "Home").unwrap();
        assert_eq!(
            url,
            "https://www.google.com/maps/search/?api=1&query=40.7128,-74.006"
        );

        let url = config.format_url(Some("apple"), position, "Corner Cafe").unwrap();
        assert!(url.ends_with("&q=Corner%20Cafe"));
    }

    #[test]
    fn test_format_url_unknown_provider() {
        let config = Config::default();
        let result = config.format_url(Some("unknown"), Coordinates::new(0.0, 0.0), "x");
        assert!(result.is_err());
    }

    #[test]
    fn test_pins_path_override() {
        let mut config = Config::default();
        config.set("storage.pins_file", "/tmp/my-pins.json").unwrap();
        assert_eq!(config.pins_path().unwrap(), PathBuf::from("/tmp/my-pins.json"));
    }

    #[test]
    fn test_save_and_load() {
        with_temp_config(|| {
            let mut config = Config::default();
            config.pins.color = "purple".to_string();
            config.server.port = 8080;
            config.save().unwrap();

            let loaded = Config::load().unwrap();
            assert_eq!(loaded.pins.color, "purple");
            assert_eq!(loaded.server.port, 8080);
        });
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let loaded: Config = toml::from_str("[pins]\ncolor = \"teal\"\n").unwrap();
        assert_eq!(loaded.pins.color, "teal");
        assert_eq!(loaded.pins.alert_distance, 500);
        assert_eq!(loaded.server.port, 7979);
        assert!(loaded.url.providers.contains_key("google"));
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[pins]"));
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[url]"));
        assert!(toml.contains("[url.providers]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7979");
    }

    #[test]
    fn test_available_keys() {
        let keys = Config::available_keys();
        assert!(keys.contains(&"pins.alert_distance"));
        assert!(keys.contains(&"server.port"));
        assert!(keys.contains(&"storage.pins_file"));
    }
}
