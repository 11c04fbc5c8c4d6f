//! Response encoding and the standard envelope.
//!
//! # Responsibilities
//! - Serialize payloads to JSON before anything is committed
//! - Merge caller headers, then force `Content-Type: application/json`
//! - Wrap errors in the `{error, message, data}` envelope
//!
//! # Design Decisions
//! - A payload that cannot be serialized produces no response at all
//! - Caller headers are appended, never replacing same-named values

use std::fmt::Display;

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::http::error::{JsonError, JsonResult};
use crate::http::parser::Parser;

/// Standard response envelope.
///
/// ```json
/// { "error": false, "message": "created", "data": { "id": 7 } }
/// ```
///
/// `data` is left off the wire when it is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonResponse<T = serde_json::Value> {
    pub error: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> JsonResponse<T> {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }
}

impl Parser {
    /// Serialize `payload` and build a response with the given status.
    ///
    /// `headers` are appended to the response before the JSON content type
    /// is set. Fails with [`JsonError::Unmarshalable`] if the payload has no
    /// JSON representation, in which case nothing is built.
    pub fn write_json<T>(
        &self,
        status: StatusCode,
        payload: &T,
        headers: Option<&HeaderMap>,
    ) -> JsonResult<Response>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(payload).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialize response payload");
            JsonError::Unmarshalable(e)
        })?;

        let mut out = HeaderMap::new();
        if let Some(extra) = headers {
            for (name, value) in extra {
                out.append(name.clone(), value.clone());
            }
        }
        out.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let mut response = (status, out).into_response();
        *response.body_mut() = Body::from(body);
        Ok(response)
    }

    /// Render `err` as `{"error":true,"message":"<err>"}`.
    ///
    /// `status` defaults to 400 Bad Request.
    pub fn error_json<E>(&self, err: E, status: Option<StatusCode>) -> JsonResult<Response>
    where
        E: Display,
    {
        let status = status.unwrap_or(StatusCode::BAD_REQUEST);
        let payload: JsonResponse = JsonResponse::failure(err.to_string());
        self.write_json(status, &payload, None)
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match Parser::default().error_json(&self, Some(status)) {
            Ok(response) => response,
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        }
    }
}
