//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default alert radius for new pins, in meters
pub const DEFAULT_ALERT_DISTANCE: u32 = 500;

/// Default pin color
pub const DEFAULT_COLOR: &str = "red";

/// Default alert tone for new pins
pub const DEFAULT_SOUND: &str = "beep1";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "google";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";
