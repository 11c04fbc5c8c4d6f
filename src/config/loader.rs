//! Parsing the decoder config out of a host application's TOML.

use crate::config::schema::ParserConfig;
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ParserConfig {
    /// Parse a TOML fragment such as:
    ///
    /// ```toml
    /// max_json_size = 4096
    /// allow_unknown_fields = true
    /// ```
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ParserConfig = toml::from_str(content)?;
        Ok(config)
    }
}
