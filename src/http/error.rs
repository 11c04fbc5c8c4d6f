//! Error taxonomy for the decode and encode paths.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors returned by [`Parser`](crate::http::Parser) operations.
///
/// The display text is safe to hand back to API clients; it is what
/// [`Parser::error_json`](crate::http::Parser::error_json) puts in the
/// envelope's `message`.
#[derive(Debug, Error)]
pub enum JsonError {
    /// `Content-Type` was present but not `application/json`.
    #[error("Content-Type header {content_type:?} is not application/json")]
    UnsupportedMediaType { content_type: String },

    /// The body went past the configured size cap.
    #[error("body must not be larger than {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// No JSON value before end of input.
    #[error("body must not be empty")]
    EmptyBody,

    /// Malformed JSON, including documents cut off mid-value.
    #[error("body contains badly-formed JSON (at line {line}, column {column})")]
    Syntax { line: usize, column: usize },

    /// Well-formed JSON whose values do not fit the target shape.
    #[error("body contains incorrect JSON type ({detail})")]
    Type { detail: String },

    /// An object key the target shape does not declare.
    #[error("body contains unknown key {key:?}")]
    UnknownField { key: String },

    /// Content after the first top-level value.
    #[error("body must only contain a single JSON value")]
    TrailingData,

    /// The caller passed no destination to decode into.
    #[error("decode target must not be absent")]
    NilTarget,

    /// The payload cannot be represented as JSON.
    #[error("payload has no JSON representation: {0}")]
    Unmarshalable(#[source] serde_json::Error),

    /// The transport failed while the body was being read.
    #[error("failed to read request body: {0}")]
    Io(#[source] std::io::Error),
}

/// Flat classification of [`JsonError`], for callers that branch on the
/// category rather than the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedMediaType,
    BodyTooLarge,
    EmptyBody,
    Syntax,
    Type,
    UnknownField,
    TrailingData,
    NilTarget,
    Unmarshalable,
    Io,
}

impl ErrorKind {
    /// True for the two structural failures: malformed JSON and mismatched types.
    pub fn is_syntax_or_type(self) -> bool {
        matches!(self, ErrorKind::Syntax | ErrorKind::Type)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnsupportedMediaType => "unsupported_media_type",
            ErrorKind::BodyTooLarge => "body_too_large",
            ErrorKind::EmptyBody => "empty_body",
            ErrorKind::Syntax => "syntax",
            ErrorKind::Type => "type",
            ErrorKind::UnknownField => "unknown_field",
            ErrorKind::TrailingData => "trailing_data",
            ErrorKind::NilTarget => "nil_target",
            ErrorKind::Unmarshalable => "unmarshalable",
            ErrorKind::Io => "io",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JsonError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JsonError::UnsupportedMediaType { .. } => ErrorKind::UnsupportedMediaType,
            JsonError::BodyTooLarge { .. } => ErrorKind::BodyTooLarge,
            JsonError::EmptyBody => ErrorKind::EmptyBody,
            JsonError::Syntax { .. } => ErrorKind::Syntax,
            JsonError::Type { .. } => ErrorKind::Type,
            JsonError::UnknownField { .. } => ErrorKind::UnknownField,
            JsonError::TrailingData => ErrorKind::TrailingData,
            JsonError::NilTarget => ErrorKind::NilTarget,
            JsonError::Unmarshalable(_) => ErrorKind::Unmarshalable,
            JsonError::Io(_) => ErrorKind::Io,
        }
    }

    /// Status used when the error is rendered as a response.
    ///
    /// `NilTarget` and `Unmarshalable` are programming errors on the server
    /// side, so they map to 500 rather than blaming the client.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ErrorKind::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::NilTarget | ErrorKind::Unmarshalable => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Result type for codec operations.
pub type JsonResult<T> = Result<T, JsonError>;
