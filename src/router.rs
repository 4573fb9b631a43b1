//! Request router.
//!
//! Two-tier lookup: an exact-match table for literal paths, then a scan of
//! parametrized patterns in registration order. Patterns use `:name`
//! segments, each capturing exactly one non-slash path segment:
//!
//! ```text
//! /api/clues/random               literal — exact table
//! /api/clues/category/:category   pattern — :category captures one segment
//! ```
//!
//! Dispatch never fails: an unmatched path produces the canonical 404
//! envelope instead of an error. Build the router once at startup and hand
//! it to [`Application::new`](crate::Application::new); the table is
//! read-only afterwards.

use std::collections::HashMap;

use http::StatusCode;
use serde_json::json;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;

enum Segment {
    Literal(String),
    Param(String),
}

struct PatternRoute {
    pattern: String,
    segments: Vec<Segment>,
    handler: BoxedHandler,
}

impl PatternRoute {
    fn compile(pattern: &str, handler: BoxedHandler) -> Self {
        let segments = pattern
            .split('/')
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_owned()),
                None => Segment::Literal(s.to_owned()),
            })
            .collect();
        Self { pattern: pattern.to_owned(), segments, handler }
    }

    /// Matches `path` against the full pattern. Returns the captured
    /// parameters, keyed by placeholder name in declaration order.
    fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_owned());
                }
            }
        }
        Some(params)
    }
}

/// The application router.
///
/// Each [`Router::on`] call returns `self` so registrations chain naturally.
/// Registering the same (method, pattern) twice silently replaces the
/// handler — last registration wins, original position kept.
pub struct Router {
    exact: HashMap<Method, HashMap<String, BoxedHandler>>,
    patterns: HashMap<Method, Vec<PatternRoute>>,
}

impl Router {
    pub fn new() -> Self {
        Self { exact: HashMap::new(), patterns: HashMap::new() }
    }

    /// Registers a handler for a method + path pair. Returns `self` for
    /// chaining. Paths with no `:name` segment land in the exact-match
    /// table; parametrized ones are scanned in registration order.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        let handler = handler.into_boxed_handler();

        if path.split('/').any(|s| s.starts_with(':')) {
            let routes = self.patterns.entry(method).or_default();
            match routes.iter_mut().find(|r| r.pattern == path) {
                Some(existing) => existing.handler = handler,
                None => routes.push(PatternRoute::compile(path, handler)),
            }
        } else {
            self.exact
                .entry(method)
                .or_default()
                .insert(path.to_owned(), handler);
        }
        self
    }

    /// Routes one request to its handler and returns the handler's response.
    ///
    /// Exact literal matches win over any pattern for the same concrete
    /// path. No match at all yields the 404 envelope.
    pub(crate) async fn dispatch(&self, mut req: Request) -> Response {
        let method = req.method();

        if let Some(handler) = self.exact.get(&method).and_then(|t| t.get(req.path())) {
            let handler = handler.clone();
            return handler.call(req).await;
        }

        if let Some(routes) = self.patterns.get(&method) {
            for route in routes {
                if let Some(params) = route.matches(req.path()) {
                    let handler = route.handler.clone();
                    req.set_route_params(params);
                    return handler.call(req).await;
                }
            }
        }

        Response::error(
            "Endpoint not found",
            StatusCode::NOT_FOUND,
            Some(json!({ "path": req.path(), "method": method.as_str() })),
        )
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn get(uri: &str) -> Request {
        Request::new(Method::Get, uri, Vec::new(), &[])
    }

    async fn echo_id(req: Request) -> Response {
        let id = req.param("id").unwrap_or("missing").to_owned();
        Response::success(json!({ "id": id }))
    }

    fn data<'a>(res: &'a Response, key: &str) -> &'a Value {
        &res.payload().unwrap()["data"][key]
    }

    #[tokio::test]
    async fn pattern_route_extracts_named_parameter() {
        let router = Router::new().on(Method::Get, "/api/clues/:id", echo_id);
        let res = router.dispatch(get("/api/clues/42")).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(data(&res, "id"), &json!("42"));
    }

    #[tokio::test]
    async fn extra_trailing_segment_does_not_match() {
        let router = Router::new().on(Method::Get, "/api/clues/:id", echo_id);
        let res = router.dispatch(get("/api/clues/42/extra")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn exact_route_beats_pattern_for_same_concrete_path() {
        let router = Router::new()
            .on(Method::Get, "/api/clues/:id", echo_id)
            .on(Method::Get, "/api/clues/random", |_req: Request| async {
                Response::success(json!({ "which": "exact" }))
            });
        let res = router.dispatch(get("/api/clues/random")).await;
        assert_eq!(data(&res, "which"), &json!("exact"));
    }

    #[tokio::test]
    async fn unmatched_path_yields_404_envelope_with_details() {
        let router = Router::new().on(Method::Get, "/api/clues/random", echo_id);
        let res = router.dispatch(get("/api/unknown")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = res.payload().unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Endpoint not found"));
        assert_eq!(body["details"]["path"], json!("/api/unknown"));
        assert_eq!(body["details"]["method"], json!("GET"));
    }

    #[tokio::test]
    async fn method_mismatch_yields_404() {
        let router = Router::new().on(Method::Post, "/api/clues/random", echo_id);
        let res = router.dispatch(get("/api/clues/random")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_registration_last_wins() {
        let router = Router::new()
            .on(Method::Get, "/api/clues/:id", |_req: Request| async {
                Response::success(json!({ "version": 1 }))
            })
            .on(Method::Get, "/api/clues/:id", |_req: Request| async {
                Response::success(json!({ "version": 2 }))
            });
        let res = router.dispatch(get("/api/clues/7")).await;
        assert_eq!(data(&res, "version"), &json!(2));
    }

    #[tokio::test]
    async fn first_registered_pattern_wins_among_overlaps() {
        let router = Router::new()
            .on(Method::Get, "/api/:section/random", |_req: Request| async {
                Response::success(json!({ "which": "first" }))
            })
            .on(Method::Get, "/api/clues/:rest", |_req: Request| async {
                Response::success(json!({ "which": "second" }))
            });
        let res = router.dispatch(get("/api/clues/random")).await;
        assert_eq!(data(&res, "which"), &json!("first"));
    }

    #[tokio::test]
    async fn multiple_placeholders_capture_independently() {
        let router = Router::new().on(
            Method::Get,
            "/api/:section/:item",
            |req: Request| async move {
                Response::success(json!({
                    "section": req.param("section").unwrap_or(""),
                    "item": req.param("item").unwrap_or(""),
                }))
            },
        );
        let res = router.dispatch(get("/api/clues/42")).await;
        assert_eq!(data(&res, "section"), &json!("clues"));
        assert_eq!(data(&res, "item"), &json!("42"));
    }
}
