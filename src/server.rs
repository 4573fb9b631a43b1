//! HTTP server: transport glue, the pre-dispatch filter chain, and graceful
//! shutdown.
//!
//! Per-request pipeline, in order:
//!
//! 1. `OPTIONS` short-circuits with `200` and an empty body (CORS preflight).
//! 2. The validation filter rejects suspicious or oversized URIs with `400`.
//! 3. The [`RateLimitPolicy`] may reject with `429`.
//! 4. The [`Application`] dispatches to a handler.
//!
//! On SIGTERM or Ctrl-C the listener stops accepting and every in-flight
//! connection is drained before [`Server::serve`] returns.

use std::net::SocketAddr;
use std::sync::Arc;

use http::StatusCode;
use http_body_util::BodyExt;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::app::Application;
use crate::limit::{AllowAll, RateLimitPolicy};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
    policy: Arc<dyn RateLimitPolicy>,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called. Rate limiting defaults to [`AllowAll`].
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    pub fn bind(addr: &str) -> Self {
        let addr: SocketAddr = addr.parse().expect("invalid socket address");
        Self { addr, policy: Arc::new(AllowAll) }
    }

    /// Swaps in a real rate-limit policy.
    pub fn rate_limit(mut self, policy: impl RateLimitPolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Accepts connections and dispatches them through `app`.
    ///
    /// Returns only after a full graceful shutdown.
    pub async fn serve(self, app: Application) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.addr).await?;

        let app = Arc::new(app);
        let policy = self.policy;

        info!(addr = %self.addr, "quizd listening");

        // JoinSet tracks connection tasks so shutdown can drain them.
        let mut tasks = tokio::task::JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Check shutdown first so SIGTERM immediately stops
                // accepting, even with connections queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let app = Arc::clone(&app);
                    let policy = Arc::clone(&policy);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        let svc = service_fn(move |req| {
                            let app = Arc::clone(&app);
                            let policy = Arc::clone(&policy);
                            async move { dispatch(app, policy, req).await }
                        });

                        // auto::Builder negotiates HTTP/1.1 or HTTP/2.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished tasks so the set does not grow unbounded.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("quizd stopped");
        Ok(())
    }
}

// ── Request pipeline ──────────────────────────────────────────────────────────

/// Transport-facing entry point. The error type is
/// [`Infallible`](std::convert::Infallible): every failure becomes a JSON
/// envelope, so hyper never sees an error.
async fn dispatch(
    app: Arc<Application>,
    policy: Arc<dyn RateLimitPolicy>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<http_body_util::Full<bytes::Bytes>>, std::convert::Infallible> {
    let response = match to_request(req).await {
        Ok(request) => respond(&app, policy.as_ref(), request).await,
        Err(rejection) => rejection,
    };
    Ok(response.into_http())
}

/// Normalizes the hyper request into our [`Request`], or produces the
/// rejection response directly.
async fn to_request(
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<Request, Response> {
    let (parts, body) = req.into_parts();

    let Ok(method) = parts.method.as_str().parse::<Method>() else {
        return Err(Response::error(
            "Invalid or malicious request detected",
            StatusCode::BAD_REQUEST,
            None,
        ));
    };

    let uri = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| parts.uri.path().to_owned());

    let headers = parts
        .headers
        .iter()
        .map(|(k, v)| {
            (k.as_str().to_owned(), String::from_utf8_lossy(v.as_bytes()).into_owned())
        })
        .collect();

    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => {
            return Err(Response::error(
                "Failed to read request body",
                StatusCode::BAD_REQUEST,
                None,
            ));
        }
    };

    Ok(Request::new(method, uri, headers, &bytes))
}

/// The filter chain in front of the dispatcher.
pub(crate) async fn respond(
    app: &Application,
    policy: &dyn RateLimitPolicy,
    req: Request,
) -> Response {
    if req.method() == Method::Options {
        return Response::empty(StatusCode::OK);
    }

    if !req.is_valid() {
        return Response::error(
            "Invalid or malicious request detected",
            StatusCode::BAD_REQUEST,
            None,
        );
    }

    if !policy.allow(&req) {
        return Response::error("Rate limit exceeded", StatusCode::TOO_MANY_REQUESTS, None);
    }

    app.handle(req).await
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal: SIGTERM or SIGINT on Unix, Ctrl-C
/// elsewhere.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
