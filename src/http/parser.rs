//! The codec entry point shared by the decode and encode paths.

use crate::config::ParserConfig;

/// Reads and writes JSON payloads under a fixed [`ParserConfig`].
///
/// A `Parser` holds no per-request state; clone it into router state and
/// use it from any number of handlers concurrently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }
}

impl From<ParserConfig> for Parser {
    fn from(config: ParserConfig) -> Self {
        Self::new(config)
    }
}
