//! Clue endpoint handlers.
//!
//! Each function here is a handler *factory*: it captures the shared
//! [`TriviaSource`] in a closure and returns something the router can
//! register. Source failures are translated into error envelopes at this
//! boundary — a raw [`TriviaError`] never crosses into the transport layer.

use std::sync::Arc;

use http::StatusCode;
use serde_json::json;
use tracing::warn;

use crate::error::TriviaError;
use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;
use crate::source::TriviaSource;

fn source_failure(message: &str, e: &TriviaError) -> Response {
    warn!(error = %e, "trivia source failure");
    Response::error(
        message,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(json!({ "message": e.to_string() })),
    )
}

/// `GET /api/clues/random`
pub fn random(source: Arc<dyn TriviaSource>) -> impl Handler {
    move |_req: Request| {
        let source = Arc::clone(&source);
        async move {
            match source.random_clue().await {
                Ok(clue) => Response::success(json!({ "clue": clue })),
                Err(e) => source_failure("Failed to fetch clue", &e),
            }
        }
    }
}

/// `GET /api/clues/category/:category`
pub fn by_category(source: Arc<dyn TriviaSource>) -> impl Handler {
    move |req: Request| {
        let source = Arc::clone(&source);
        async move {
            let category = req.param("category").unwrap_or_default().to_owned();
            match source.clues_by_category(&category).await {
                Ok(clues) => Response::success(json!({ "clues": clues })),
                Err(e) => source_failure("Failed to fetch clues", &e),
            }
        }
    }
}

/// `GET /api/clues/difficulty/:difficulty`
pub fn by_difficulty(source: Arc<dyn TriviaSource>) -> impl Handler {
    move |req: Request| {
        let source = Arc::clone(&source);
        async move {
            let difficulty = req.param("difficulty").unwrap_or_default().to_owned();
            match source.clues_by_difficulty(&difficulty).await {
                Ok(clues) => Response::success(json!({ "clues": clues })),
                Err(e) => source_failure("Failed to fetch clues", &e),
            }
        }
    }
}

/// `GET /api/clues/search?q=keyword&limit=n`
pub fn search(source: Arc<dyn TriviaSource>) -> impl Handler {
    move |req: Request| {
        let source = Arc::clone(&source);
        async move {
            let Some(keyword) = req.query("q").map(str::to_owned) else {
                return Response::error(
                    "Missing required query parameter: q",
                    StatusCode::BAD_REQUEST,
                    None,
                );
            };
            let limit = req
                .query("limit")
                .and_then(|l| l.parse().ok())
                .unwrap_or(10);

            match source.search(&keyword, limit).await {
                Ok(clues) => Response::success(json!({ "clues": clues })),
                Err(e) => source_failure("Failed to search clues", &e),
            }
        }
    }
}
