//! quizd binary: wires the route table, picks a trivia source from the
//! environment, and serves.
//!
//! Configuration, all optional:
//!
//! | Variable          | Default              | Meaning                          |
//! |-------------------|----------------------|----------------------------------|
//! | `QUIZD_ADDR`      | `0.0.0.0:8080`       | Listen address                   |
//! | `QUIZD_SOURCE`    | `opentdb`            | `opentdb` or `local`             |
//! | `QUIZD_DATA_FILE` | `data/questions.json`| Corpus path for the local source |

use std::sync::Arc;

use tracing::info;

use quizd::source::{LocalJeopardySource, OpenTriviaSource, TriviaSource};
use quizd::{Application, Method, Router, Server, clues, health};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// The route table, mirroring the API surface the quiz client consumes.
fn routes(source: Arc<dyn TriviaSource>) -> Router {
    Router::new()
        .on(Method::Get, "/api/clues/random", clues::random(Arc::clone(&source)))
        .on(Method::Get, "/api/clues/category/:category", clues::by_category(Arc::clone(&source)))
        .on(Method::Get, "/api/clues/difficulty/:difficulty", clues::by_difficulty(Arc::clone(&source)))
        .on(Method::Get, "/api/clues/search", clues::search(Arc::clone(&source)))
        .on(Method::Get, "/healthz", health::liveness)
        .on(Method::Get, "/readyz", health::readiness)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let addr = env_or("QUIZD_ADDR", "0.0.0.0:8080");

    let source: Arc<dyn TriviaSource> = match env_or("QUIZD_SOURCE", "opentdb").as_str() {
        "local" => {
            let path = env_or("QUIZD_DATA_FILE", "data/questions.json");
            let local = LocalJeopardySource::new(&path).expect("failed to load question corpus");
            info!(path = %path, questions = local.question_count(), "loaded local corpus");
            Arc::new(local)
        }
        _ => Arc::new(OpenTriviaSource::new()),
    };

    info!(source = source.name(), "trivia source selected");

    Server::bind(&addr)
        .serve(Application::new(routes(source)))
        .await
        .expect("server error");
}
