//! Incoming HTTP request type.
//!
//! A [`Request`] is built once per inbound call and is read-only afterwards,
//! except for route-parameter injection by the
//! [`Router`](crate::Router) when a pattern matches.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::method::Method;

/// URIs longer than this are rejected before dispatch.
const MAX_URI_LEN: usize = 2048;

/// An incoming HTTP request, normalized from the transport.
pub struct Request {
    method: Method,
    uri: String,
    path: String,
    query: HashMap<String, String>,
    body: Map<String, Value>,
    headers: Vec<(String, String)>,
    params: HashMap<String, String>,
}

impl Request {
    /// Builds a request from its transport-level parts.
    ///
    /// The query string is stripped from `uri` to form the path and parsed
    /// into key/value pairs (last occurrence wins on duplicate keys). The
    /// body is parsed as a JSON object when the content-type says JSON, and
    /// as form-encoded pairs otherwise; only `POST`, `PUT` and `PATCH`
    /// requests carry body parameters.
    pub fn new(
        method: Method,
        uri: impl Into<String>,
        headers: Vec<(String, String)>,
        body: &[u8],
    ) -> Self {
        let uri = uri.into();

        let (path, query_str) = match uri.split_once('?') {
            Some((p, q)) => (p, q),
            None => (uri.as_str(), ""),
        };
        let path = if path.is_empty() { "/".to_owned() } else { path.to_owned() };

        let mut query = HashMap::new();
        for (k, v) in form_urlencoded::parse(query_str.as_bytes()) {
            query.insert(k.into_owned(), v.into_owned());
        }

        let mut req = Self {
            method,
            path,
            query,
            body: Map::new(),
            headers,
            params: HashMap::new(),
            uri,
        };
        req.body = req.parse_body(body);
        req
    }

    fn parse_body(&self, raw: &[u8]) -> Map<String, Value> {
        if !matches!(self.method, Method::Post | Method::Put | Method::Patch) {
            return Map::new();
        }

        let is_json = self
            .header("content-type")
            .is_some_and(|ct| ct.contains("application/json"));

        if is_json {
            // An unparseable or non-object JSON body degrades to no body
            // parameters rather than failing the request.
            match serde_json::from_slice::<Value>(raw) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            }
        } else {
            form_urlencoded::parse(raw)
                .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
                .collect()
        }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn uri(&self) -> &str { &self.uri }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a query parameter by key.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Returns a body parameter by key.
    pub fn body(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/api/clues/:id`, `req.param("id")` on `/api/clues/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub(crate) fn set_route_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }

    /// Screens the raw URI for common attack patterns and excessive length.
    ///
    /// This is a coarse pre-dispatch filter, not an authorization layer:
    /// directory traversal, script injection, SQL-injection shapes, and code
    /// injection markers all cause outright rejection.
    pub fn is_valid(&self) -> bool {
        if self.uri.len() > MAX_URI_LEN {
            return false;
        }

        let lower = self.uri.to_ascii_lowercase();

        if lower.contains("..")
            || lower.contains("<script")
            || lower.contains("eval(")
            || lower.contains("base64_decode")
        {
            return false;
        }

        // union ... select, in that order
        if let Some(i) = lower.find("union") {
            if lower[i..].contains("select") {
                return false;
            }
        }

        true
    }
}
