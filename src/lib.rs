//! Strict JSON request/response codec for axum services.

pub mod config;
pub mod http;
pub mod observability;

pub use config::ParserConfig;
pub use http::{ErrorKind, HttpServer, JsonError, JsonResponse, Parser, StrictJson};
