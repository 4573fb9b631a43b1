//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Every response the API emits is one well-formed JSON object wrapped in
//! the envelope the quiz client expects:
//!
//! ```json
//! {"success": true,  "data": ...}
//! {"success": false, "error": "...", "details": {...}}
//! ```
//!
//! The body is held as a [`serde_json::Value`] until the transport boundary
//! and serialized exactly once, in [`Response::into_http`], which also
//! stamps the CORS and content-type headers onto every response.

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use serde_json::{Value, json};

use crate::error::TriviaError;

/// An outgoing HTTP response.
///
/// # Shortcuts
///
/// ```rust
/// use http::StatusCode;
/// use quizd::Response;
/// use serde_json::json;
///
/// Response::success(json!({"clue": {}}));
/// Response::error("Failed to fetch clue", StatusCode::INTERNAL_SERVER_ERROR, None);
/// Response::empty(StatusCode::OK);
/// ```
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Option<Value>,
}

impl Response {
    /// `200 OK` with a `{success: true, data}` envelope.
    pub fn success(data: Value) -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            body: Some(json!({ "success": true, "data": data })),
        }
    }

    /// An error envelope: `{success: false, error, details?}`.
    pub fn error(message: &str, status: StatusCode, details: Option<Value>) -> Self {
        let mut body = json!({ "success": false, "error": message });
        if let (Some(obj), Some(details)) = (body.as_object_mut(), details) {
            obj.insert("details".to_owned(), details);
        }
        Self { status, headers: Vec::new(), body: Some(body) }
    }

    /// A response with a caller-defined JSON structure.
    pub fn json(body: Value, status: StatusCode) -> Self {
        Self { status, headers: Vec::new(), body: Some(body) }
    }

    /// A response with no body at all (the `OPTIONS` short-circuit).
    pub fn empty(status: StatusCode) -> Self {
        Self { status, headers: Vec::new(), body: None }
    }

    /// Appends an extra header. CORS and content-type are added at the
    /// transport boundary and never need to be set here.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The JSON payload, if any. Mostly useful in tests.
    pub fn payload(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Serializes into the hyper-facing response, applying the headers every
    /// response carries.
    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder()
            .status(self.status)
            .header("content-type", "application/json; charset=UTF-8")
            .header("access-control-allow-origin", "*")
            .header("access-control-allow-methods", "GET, POST, PUT, DELETE, OPTIONS")
            .header("access-control-allow-headers", "Content-Type, Authorization");

        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let bytes = match &self.body {
            Some(value) => serde_json::to_vec(value).unwrap_or_else(|_| {
                br#"{"success":false,"error":"Response serialization failed"}"#.to_vec()
            }),
            None => Vec::new(),
        };

        builder.body(Full::new(Bytes::from(bytes))).unwrap_or_else(|_| {
            // Only reachable via an invalid caller-supplied header.
            let mut fallback = http::Response::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implemented for `Result<Response, TriviaError>` so a handler may bubble a
/// failure with `?`; the dispatcher turns any such failure into a generic
/// `500` envelope carrying the failure's message as detail. The transport
/// layer never observes an unhandled failure.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for Result<Response, TriviaError> {
    fn into_response(self) -> Response {
        match self {
            Ok(response) => response,
            Err(e) => Response::error(
                "An error occurred while processing your request",
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(json!({ "message": e.to_string() })),
            ),
        }
    }
}
