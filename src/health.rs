//! Built-in health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can it serve traffic? |
//!
//! Register them on the router:
//!
//! ```rust,no_run
//! use quizd::{Method, Router, health};
//!
//! let app = Router::new()
//!     .on(Method::Get, "/healthz", health::liveness)
//!     .on(Method::Get, "/readyz", health::readiness);
//! ```
//!
//! Replace `readiness` with your own handler if serving traffic depends on
//! something warming up first (e.g. a slow corpus load).

use http::StatusCode;
use serde_json::json;

use crate::{Request, Response};

/// Liveness probe handler.
///
/// Always `200`. If the process can answer HTTP at all, it is alive — this
/// handler intentionally has no dependencies.
pub async fn liveness(_req: Request) -> Response {
    Response::json(json!({ "status": "ok" }), StatusCode::OK)
}

/// Readiness probe handler (default implementation).
///
/// The route table and trivia source are both immutable after startup, so
/// once the process is up it is ready.
pub async fn readiness(_req: Request) -> Response {
    Response::json(json!({ "status": "ready" }), StatusCode::OK)
}
