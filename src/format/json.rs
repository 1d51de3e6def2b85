//! JSON output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::pin::Pin;
use crate::store::PinRecord;

/// JSON formatter - outputs pins in their persisted record layout
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Pin records as JSON"
    }

    fn format(&self, pins: &[Pin], _config: &Config) -> Result<String> {
        let records: Vec<PinRecord> = pins.iter().map(PinRecord::from).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }
}
