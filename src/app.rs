//! Application dispatcher.
//!
//! Owns the route table and mediates one request/response cycle. The route
//! table is built once at startup (see the binary's `routes()` function) and
//! injected here; nothing mutates it afterwards.

use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// The application: a [`Router`] plus the guarantee that every request gets
/// a well-formed JSON response.
///
/// Failure containment is layered. Handlers translate
/// [`TriviaError`](crate::TriviaError)s they anticipate into error
/// envelopes themselves; anything they bubble with `?` is converted into a
/// generic `500` envelope by the `IntoResponse` impl on `Result` before it
/// reaches the router. `dispatch` itself covers the remaining case, the
/// unmatched route, with the 404 envelope. The transport layer never sees a
/// failure.
pub struct Application {
    router: Router,
}

impl Application {
    /// Wraps a fully-registered route table.
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Handles a single request.
    pub async fn handle(&self, req: Request) -> Response {
        self.router.dispatch(req).await
    }
}
