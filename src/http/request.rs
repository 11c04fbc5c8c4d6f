//! Request body decoding.
//!
//! # Responsibilities
//! - Gate on the `Content-Type` header before touching the body
//! - Cap the body at the configured size while it is being read
//! - Decode exactly one JSON value into the caller's target shape
//! - Reject unknown keys (at any depth) unless configured to allow them
//! - Classify every failure into a [`JsonError`]
//!
//! # Pipeline
//! ```text
//! Content-Type check → LimitReader → serde_json (+ serde_ignored) → end-of-input check
//! ```

use std::io::{self, BufReader, Read};

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap},
};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::http::error::{JsonError, JsonResult};
use crate::http::limits::LimitReader;
use crate::http::parser::Parser;

const JSON_MEDIA_TYPE: &str = "application/json";

impl Parser {
    /// Decode a single JSON document from `body` into a `T`.
    ///
    /// `content_type` is the raw `Content-Type` header value, if the request
    /// carried one. The body is consumed but not closed.
    pub fn decode<T, R>(&self, content_type: Option<&str>, body: R) -> JsonResult<T>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let result = check_content_type(content_type).and_then(|()| self.decode_body(body));
        log_rejection(&result);
        result
    }

    /// Decode into a caller-provided destination.
    ///
    /// Fails with [`JsonError::NilTarget`] when `target` is `None`, without
    /// reading the body. On any other failure `target` is left untouched.
    pub fn decode_into<T, R>(
        &self,
        content_type: Option<&str>,
        body: R,
        target: Option<&mut T>,
    ) -> JsonResult<()>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let Some(target) = target else {
            tracing::debug!(kind = "nil_target", "Decode called without a target");
            return Err(JsonError::NilTarget);
        };
        *target = self.decode(content_type, body)?;
        Ok(())
    }

    /// Decode the body of an axum request.
    ///
    /// The body is pulled frame by frame and abandoned as soon as it grows
    /// past the size limit.
    pub async fn read_json<T>(&self, request: Request) -> JsonResult<T>
    where
        T: DeserializeOwned,
    {
        let (parts, body) = request.into_parts();
        let result = self.read_json_parts(&parts.headers, body).await;
        log_rejection(&result);
        result
    }

    async fn read_json_parts<T>(&self, headers: &HeaderMap, body: Body) -> JsonResult<T>
    where
        T: DeserializeOwned,
    {
        check_content_type(content_type_of(headers)?)?;
        let bytes = collect_body(body, self.config().effective_max_json_size()).await?;
        self.decode_body(bytes.as_slice())
    }

    fn decode_body<T, R>(&self, body: R) -> JsonResult<T>
    where
        T: DeserializeOwned,
        R: Read,
    {
        let limit = self.config().effective_max_json_size();
        let mut limited = LimitReader::new(body, limit as u64);
        let outcome = decode_single::<T, _>(
            BufReader::new(&mut limited),
            self.config().allow_unknown_fields,
        );

        outcome.map_err(|failure| {
            if limited.exceeded() {
                return JsonError::BodyTooLarge { limit };
            }
            failure.classify(limited.saw_content())
        })
    }
}

/// Raw failure from the decode step, before the limit reader is consulted.
enum Failure {
    Value(serde_json::Error),
    UnknownField(String),
    Trailing(serde_json::Error),
}

impl Failure {
    fn classify(self, saw_content: bool) -> JsonError {
        match self {
            Failure::UnknownField(key) => JsonError::UnknownField { key },
            Failure::Trailing(err) if err.is_io() => JsonError::Io(io::Error::from(err)),
            Failure::Trailing(_) => JsonError::TrailingData,
            Failure::Value(err) => match err.classify() {
                Category::Io => JsonError::Io(io::Error::from(err)),
                Category::Eof if !saw_content => JsonError::EmptyBody,
                Category::Eof | Category::Syntax => JsonError::Syntax {
                    line: err.line(),
                    column: err.column(),
                },
                Category::Data => JsonError::Type {
                    detail: err.to_string(),
                },
            },
        }
    }
}

fn decode_single<T, R>(reader: R, allow_unknown_fields: bool) -> Result<T, Failure>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut de = serde_json::Deserializer::from_reader(reader);

    let value = if allow_unknown_fields {
        T::deserialize(&mut de).map_err(Failure::Value)?
    } else {
        let mut unknown: Option<String> = None;
        let value: T = serde_ignored::deserialize(&mut de, |path| {
            if unknown.is_none() {
                unknown = Some(path.to_string());
            }
        })
        .map_err(Failure::Value)?;
        if let Some(key) = unknown {
            return Err(Failure::UnknownField(key));
        }
        value
    };

    // Anything but whitespace up to EOF is a second document.
    de.end().map_err(Failure::Trailing)?;
    Ok(value)
}

/// Collect an axum body, failing once more than `limit` bytes arrive.
async fn collect_body(body: Body, limit: usize) -> JsonResult<Vec<u8>> {
    let mut stream = body.into_data_stream();
    let mut buf = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| JsonError::Io(io::Error::other(e)))?;
        if buf.len() + chunk.len() > limit {
            return Err(JsonError::BodyTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(buf)
}

fn content_type_of(headers: &HeaderMap) -> JsonResult<Option<&str>> {
    match headers.get(header::CONTENT_TYPE) {
        None => Ok(None),
        Some(value) => value.to_str().map(Some).map_err(|_| JsonError::UnsupportedMediaType {
            content_type: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        }),
    }
}

/// An absent header passes; a present one must be `application/json`,
/// ignoring case and any parameters such as `charset`.
fn check_content_type(content_type: Option<&str>) -> JsonResult<()> {
    let Some(value) = content_type else {
        return Ok(());
    };
    let essence = value.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case(JSON_MEDIA_TYPE) {
        Ok(())
    } else {
        Err(JsonError::UnsupportedMediaType {
            content_type: value.to_string(),
        })
    }
}

fn log_rejection<T>(result: &JsonResult<T>) {
    if let Err(e) = result {
        tracing::debug!(kind = %e.kind(), error = %e, "Rejected JSON request body");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::http::error::ErrorKind;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Target {
        #[serde(default)]
        foo: String,
    }

    #[derive(Debug, Deserialize)]
    struct Outer {
        #[allow(dead_code)]
        inner: Inner,
    }

    #[derive(Debug, Deserialize)]
    struct Inner {
        #[allow(dead_code)]
        name: String,
    }

    fn parser(max_json_size: usize, allow_unknown_fields: bool) -> Parser {
        Parser::new(ParserConfig {
            max_json_size,
            allow_unknown_fields,
        })
    }

    fn decode_kind(body: &str, max: usize, allow_unknown: bool) -> Result<Target, ErrorKind> {
        parser(max, allow_unknown)
            .decode::<Target, _>(Some("application/json"), body.as_bytes())
            .map_err(|e| e.kind())
    }

    #[test]
    fn test_read_json_table() {
        struct Case {
            name: &'static str,
            json: &'static str,
            expected: Result<(), ErrorKind>,
            max_size: usize,
            allow_unknown: bool,
        }

        let cases = [
            Case { name: "good json", json: r#"{"foo": "bar"}"#, expected: Ok(()), max_size: 1024, allow_unknown: false },
            Case { name: "badly formatted json", json: r#"{"foo":"}"#, expected: Err(ErrorKind::Syntax), max_size: 1024, allow_unknown: false },
            Case { name: "incorrect type", json: r#"{"foo": 1}"#, expected: Err(ErrorKind::Type), max_size: 1024, allow_unknown: false },
            Case { name: "numeric key", json: r#"{1: 1}"#, expected: Err(ErrorKind::Syntax), max_size: 1024, allow_unknown: false },
            Case { name: "two json documents", json: r#"{"foo": "bar"}{"alpha": "beta"}"#, expected: Err(ErrorKind::TrailingData), max_size: 1024, allow_unknown: false },
            Case { name: "empty body", json: "", expected: Err(ErrorKind::EmptyBody), max_size: 1024, allow_unknown: false },
            Case { name: "stray quote after number", json: r#"{"foo": 1"}"#, expected: Err(ErrorKind::Type), max_size: 1024, allow_unknown: false },
            Case { name: "unknown field in json", json: r#"{"fooo": "bar"}"#, expected: Err(ErrorKind::UnknownField), max_size: 1024, allow_unknown: false },
            Case { name: "float for string field", json: r#"{"foo": 10.2}"#, expected: Err(ErrorKind::Type), max_size: 1024, allow_unknown: false },
            Case { name: "allow unknown field in json", json: r#"{"fooo": "bar"}"#, expected: Ok(()), max_size: 1024, allow_unknown: true },
            Case { name: "unquoted field name", json: r#"{jack: "bar"}"#, expected: Err(ErrorKind::Syntax), max_size: 1024, allow_unknown: false },
            Case { name: "body too large", json: r#"{"foo": "bar"}"#, expected: Err(ErrorKind::BodyTooLarge), max_size: 5, allow_unknown: false },
            Case { name: "not json", json: "Hello, world", expected: Err(ErrorKind::Syntax), max_size: 1024, allow_unknown: false },
        ];

        for case in cases {
            let got = decode_kind(case.json, case.max_size, case.allow_unknown).map(|_| ());
            assert_eq!(got, case.expected, "{}: {}", case.name, case.json);
        }
    }

    #[test]
    fn test_good_json_populates_target() {
        let target = decode_kind(r#"{"foo": "bar"}"#, 1024, false).unwrap();
        assert_eq!(target.foo, "bar");
    }

    #[test]
    fn test_allowed_unknown_field_is_ignored() {
        let target = decode_kind(r#"{"fooo": "bar"}"#, 1024, true).unwrap();
        assert_eq!(target, Target::default());
    }

    #[test]
    fn test_unknown_field_names_key() {
        let err = parser(1024, false)
            .decode::<Target, _>(None, &br#"{"fooo": "bar"}"#[..])
            .unwrap_err();
        match err {
            JsonError::UnknownField { key } => assert_eq!(key, "fooo"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nested_unknown_field_rejected() {
        let body = br#"{"inner": {"name": "x", "extra": true}}"#;
        let err = parser(1024, false)
            .decode::<Outer, _>(None, &body[..])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownField);
        assert!(err.to_string().contains("extra"));

        let ok = parser(1024, true).decode::<Outer, _>(None, &body[..]);
        assert!(ok.is_ok());
    }

    #[test]
    fn test_wrong_content_type_rejected() {
        let err = parser(1024, false)
            .decode::<Target, _>(Some("application/xml"), &br#"{"foo": "bar"}"#[..])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMediaType);
    }

    #[test]
    fn test_content_type_rejected_before_body_read() {
        struct PanicReader;
        impl Read for PanicReader {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                panic!("body must not be read");
            }
        }

        let err = parser(1024, false)
            .decode::<Target, _>(Some("text/plain"), PanicReader)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMediaType);
    }

    #[test]
    fn test_content_type_parameters_and_case() {
        for ct in ["application/json; charset=utf-8", "Application/JSON", " application/json "] {
            let got = parser(1024, false).decode::<Target, _>(Some(ct), &br#"{"foo": "bar"}"#[..]);
            assert!(got.is_ok(), "{ct} should be accepted");
        }
        let got = parser(1024, false).decode::<Target, _>(None, &br#"{"foo": "bar"}"#[..]);
        assert!(got.is_ok(), "missing header should be accepted");
    }

    #[test]
    fn test_body_exactly_at_limit() {
        let body = r#"{"foo": "bar"}"#;
        assert!(decode_kind(body, body.len(), false).is_ok());
        assert_eq!(decode_kind(body, body.len() - 1, false).unwrap_err(), ErrorKind::BodyTooLarge);
    }

    #[test]
    fn test_trailing_whitespace_allowed() {
        assert!(decode_kind("{\"foo\": \"bar\"}\n  \r\n", 1024, false).is_ok());
        assert_eq!(decode_kind("  \n ", 1024, false).unwrap_err(), ErrorKind::EmptyBody);
        assert_eq!(decode_kind(r#"{"foo": "bar"} x"#, 1024, false).unwrap_err(), ErrorKind::TrailingData);
    }

    #[test]
    fn test_zero_limit_uses_default() {
        assert!(decode_kind(r#"{"foo": "bar"}"#, 0, false).is_ok());
    }

    #[test]
    fn test_syntax_error_carries_position() {
        let err = parser(1024, false)
            .decode::<Target, _>(None, &br#"{"foo":"}"#[..])
            .unwrap_err();
        match err {
            JsonError::Syntax { line, column } => {
                assert_eq!(line, 1);
                assert_eq!(column, 9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_into_nil_target() {
        let err = parser(1024, false)
            .decode_into::<Target, _>(None, &br#"{"foo": "bar"}"#[..], None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NilTarget);
    }

    #[test]
    fn test_decode_into_populates_target() {
        let mut target = Target::default();
        parser(1024, false)
            .decode_into(Some("application/json"), &br#"{"foo": "bar"}"#[..], Some(&mut target))
            .unwrap();
        assert_eq!(target.foo, "bar");

        let mut untouched = Target { foo: "keep".into() };
        let err = parser(1024, false)
            .decode_into(None, &br#"{"foo": 1}"#[..], Some(&mut untouched))
            .unwrap_err();
        assert!(err.kind().is_syntax_or_type());
        assert_eq!(untouched.foo, "keep");
    }

    fn request(body: &'static str, content_type: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_read_json_request() {
        let target: Target = parser(1024, false)
            .read_json(request(r#"{"foo": "bar"}"#, Some("application/json")))
            .await
            .unwrap();
        assert_eq!(target.foo, "bar");
    }

    #[tokio::test]
    async fn test_read_json_request_rejections() {
        let p = parser(5, false);
        let err = p
            .read_json::<Target>(request(r#"{"foo": "bar"}"#, Some("application/json")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BodyTooLarge);

        let p = parser(1024, false);
        let err = p
            .read_json::<Target>(request(r#"{"foo": "bar"}"#, Some("application/xml")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedMediaType);

        let err = p
            .read_json::<Target>(request(r#"{"foo": "bar"}{"alpha": "beta"}"#, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TrailingData);

        let err = p.read_json::<Target>(request("", None)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyBody);
    }
}
