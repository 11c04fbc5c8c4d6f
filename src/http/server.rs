//! Demo HTTP server wiring the codec into an axum router.
//!
//! # Responsibilities
//! - Create Axum Router with the echo and health handlers
//! - Carry the configured [`Parser`] in router state
//! - Wire up request tracing
//! - Serve with graceful shutdown

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::http::extract::StrictJson;
use crate::http::parser::Parser;
use crate::http::response::JsonResponse;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub parser: Parser,
}

impl FromRef<AppState> for Parser {
    fn from_ref(state: &AppState) -> Self {
        state.parser.clone()
    }
}

/// Body accepted by `POST /echo`.
#[derive(Debug, Deserialize)]
pub struct EchoRequest {
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// HTTP server exposing the codec.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(parser: Parser) -> Self {
        let state = AppState { parser };
        let router = Router::new()
            .route("/echo", post(echo_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());
        Self { router }
    }

    /// The router, for mounting elsewhere or driving directly in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn echo_handler(
    State(state): State<AppState>,
    StrictJson(request): StrictJson<EchoRequest>,
) -> Response {
    tracing::debug!(message_len = request.message.len(), has_data = request.data.is_some(), "Echo request");

    let payload = JsonResponse {
        error: false,
        message: request.message,
        data: request.data,
    };
    state
        .parser
        .write_json(StatusCode::OK, &payload, None)
        .unwrap_or_else(IntoResponse::into_response)
}

async fn health_handler(State(state): State<AppState>) -> Response {
    let payload: JsonResponse = JsonResponse::success("ok");
    state
        .parser
        .write_json(StatusCode::OK, &payload, None)
        .unwrap_or_else(IntoResponse::into_response)
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
