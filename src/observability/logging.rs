//! Structured logging.
//!
//! The codec itself only emits `tracing` events; binaries call [`init`]
//! once at startup. `RUST_LOG` overrides the default filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_FILTER: &str = "json_codec=debug,tower_http=debug";

/// Install the global subscriber (env filter + fmt layer).
pub fn init(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
