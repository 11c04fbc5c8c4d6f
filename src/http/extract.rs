//! Axum extractor running the strict decoder.

use axum::{
    extract::{FromRef, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::http::error::JsonError;
use crate::http::parser::Parser;

/// JSON body decoded with the router's [`Parser`].
///
/// Unlike `axum::Json`, this rejects trailing documents and unknown keys
/// (unless the parser allows them), and rejections are rendered as the
/// standard error envelope.
///
/// ```ignore
/// async fn create(StrictJson(req): StrictJson<CreateUser>) -> impl IntoResponse { .. }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictJson<T>(pub T);

impl<T, S> FromRequest<S> for StrictJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Parser: FromRef<S>,
{
    type Rejection = JsonError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let parser = Parser::from_ref(state);
        parser.read_json(req).await.map(StrictJson)
    }
}

impl<T> IntoResponse for StrictJson<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        Parser::default()
            .write_json(StatusCode::OK, &self.0, None)
            .unwrap_or_else(IntoResponse::into_response)
    }
}
