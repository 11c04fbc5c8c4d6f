//! HTTP payload codec.
//!
//! # Data Flow
//! ```text
//! Request
//!     → request.rs (Content-Type gate, limits.rs cap, strict decode)
//!     → handler business logic
//!     → response.rs (serialize, merge headers, envelope)
//!     → Send to client
//! ```
//!
//! `extract.rs` packages the decode path as an axum extractor and
//! `server.rs` is a small router demonstrating both directions.

pub mod error;
pub mod extract;
pub mod limits;
pub mod parser;
pub mod request;
pub mod response;
pub mod server;

pub use error::{ErrorKind, JsonError, JsonResult};
pub use extract::StrictJson;
pub use parser::Parser;
pub use response::JsonResponse;
pub use server::HttpServer;
