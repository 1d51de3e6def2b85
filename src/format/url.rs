//! URL output formatter

use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::pin::Pin;

/// URL formatter - one map link per pin
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format links with optional provider override
    pub fn format_with_provider(
        &self,
        pins: &[Pin],
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        let mut output = String::new();
        for pin in pins {
            let url = config.format_url(provider, pin.position, &pin.name)?;
            output.push_str(&format!("{}\t{}\n", pin.name, url));
        }
        Ok(output)
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map link per pin"
    }

    fn format(&self, pins: &[Pin], config: &Config) -> Result<String> {
        self.format_with_provider(pins, config, None)
    }
}
