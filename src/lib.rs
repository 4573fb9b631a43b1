//! # quizd
//!
//! A small JSON API that fetches trivia questions from a backing source,
//! normalizes them into one stable [`Clue`](source::Clue) shape, and serves
//! them to a single-page quiz client. Nothing more. Nothing less.
//!
//! ## The contract
//!
//! Every response is one well-formed JSON object in the envelope the client
//! expects — `{"success": true, "data": …}` on the happy path,
//! `{"success": false, "error": …, "details": …}` on every failure path,
//! including 404s and handler faults. Clients never parse a non-JSON body.
//!
//! Trivia data comes from an interchangeable [`source::TriviaSource`]:
//! the Open Trivia Database over HTTP, or a local Jeopardy corpus loaded
//! once at startup. Swapping sources touches one line of wiring.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use quizd::source::{OpenTriviaSource, TriviaSource};
//! use quizd::{Application, Method, Router, Server, clues, health};
//!
//! #[tokio::main]
//! async fn main() {
//!     let source: Arc<dyn TriviaSource> = Arc::new(OpenTriviaSource::new());
//!
//!     let router = Router::new()
//!         .on(Method::Get, "/api/clues/random", clues::random(Arc::clone(&source)))
//!         .on(Method::Get, "/healthz", health::liveness);
//!
//!     Server::bind("0.0.0.0:8080")
//!         .serve(Application::new(router))
//!         .await
//!         .expect("server error");
//! }
//! ```

mod app;
mod error;
mod handler;
mod limit;
mod method;
mod request;
mod response;
mod router;
mod server;

pub mod clues;
pub mod health;
pub mod source;

pub use app::Application;
pub use error::TriviaError;
pub use handler::Handler;
pub use limit::{AllowAll, RateLimitPolicy};
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use server::Server;
