//! Configuration schema definitions.
//!
//! Both tunables have defaults so a host application can embed an empty
//! `[json]` table (or omit it entirely) in its own config file.

use serde::{Deserialize, Serialize};

/// Body size applied when `max_json_size` is zero (1 MiB).
pub const DEFAULT_MAX_JSON_SIZE: usize = 1024 * 1024;

/// Decoder tunables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum accepted request body size in bytes. Zero means the default.
    pub max_json_size: usize,

    /// Tolerate object keys that the target shape does not declare.
    pub allow_unknown_fields: bool,
}

impl ParserConfig {
    /// Body size limit actually enforced for a decode call.
    pub fn effective_max_json_size(&self) -> usize {
        if self.max_json_size == 0 {
            DEFAULT_MAX_JSON_SIZE
        } else {
            self.max_json_size
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_json_size: DEFAULT_MAX_JSON_SIZE,
            allow_unknown_fields: false,
        }
    }
}
