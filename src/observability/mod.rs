//! Observability subsystem.
//!
//! # Design Decisions
//! - Codec rejections are `debug` events with the error kind as a field
//! - Serialization failures on the way out are `error` events

pub mod logging;
