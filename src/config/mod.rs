//! Configuration for the JSON codec.
//!
//! # Data Flow
//! ```text
//! host config (TOML fragment) or ParserConfig::default()
//!     → loader.rs (parse & deserialize)
//!     → ParserConfig (immutable per call)
//!     → Parser::new(config), cloned into router state
//! ```
//!
//! # Design Decisions
//! - Config is plain data; a zero `max_json_size` resolves to the default
//!   at call entry
//! - All fields have defaults to allow minimal configs

pub mod loader;
pub mod schema;

pub use loader::ConfigError;
pub use schema::{ParserConfig, DEFAULT_MAX_JSON_SIZE};
