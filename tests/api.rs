//! End-to-end tests: a stubbed trivia source behind the real route table.

use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use serde_json::{Value, json};

use quizd::source::{Clue, TriviaSource};
use quizd::{Application, Method, Request, Response, Router, TriviaError, clues};

struct StubSource {
    fail: bool,
}

fn stub_clue(category: &str, difficulty: &str) -> Clue {
    Clue {
        category: category.into(),
        clue: "He was the first President of the United States".into(),
        response: "George Washington".into(),
        difficulty: difficulty.into(),
        kind: "multiple".into(),
        value: None,
        airdate: None,
        source: Some("Stub Trivia".into()),
    }
}

#[async_trait]
impl TriviaSource for StubSource {
    async fn random_clue(&self) -> Result<Clue, TriviaError> {
        if self.fail {
            return Err(TriviaError::SourceUnavailable("connection refused".into()));
        }
        Ok(stub_clue("U.S. History", "easy"))
    }

    async fn clues_by_category(&self, category: &str) -> Result<Vec<Clue>, TriviaError> {
        Ok(vec![stub_clue(category, "easy")])
    }

    async fn clues_by_difficulty(&self, difficulty: &str) -> Result<Vec<Clue>, TriviaError> {
        if !["easy", "medium", "hard"].contains(&difficulty) {
            return Err(TriviaError::InvalidArgument(format!(
                "Invalid difficulty: {difficulty}"
            )));
        }
        Ok(vec![stub_clue("U.S. History", difficulty)])
    }

    // `search` deliberately left at the default NotImplemented body.

    fn name(&self) -> &'static str {
        "Stub Trivia"
    }
}

fn app(fail: bool) -> Application {
    let source: Arc<dyn TriviaSource> = Arc::new(StubSource { fail });
    Application::new(
        Router::new()
            .on(Method::Get, "/api/clues/random", clues::random(Arc::clone(&source)))
            .on(Method::Get, "/api/clues/category/:category", clues::by_category(Arc::clone(&source)))
            .on(Method::Get, "/api/clues/difficulty/:difficulty", clues::by_difficulty(Arc::clone(&source)))
            .on(Method::Get, "/api/clues/search", clues::search(Arc::clone(&source))),
    )
}

async fn get(app: &Application, uri: &str) -> Response {
    app.handle(Request::new(Method::Get, uri, Vec::new(), &[])).await
}

fn body(res: &Response) -> &Value {
    res.payload().expect("response should carry a JSON body")
}

#[tokio::test]
async fn random_clue_round_trip() {
    let app = app(false);
    let res = get(&app, "/api/clues/random").await;

    assert_eq!(res.status(), StatusCode::OK);
    let clue = &body(&res)["data"]["clue"];
    for field in ["category", "clue", "response"] {
        let text = clue[field].as_str().unwrap();
        assert!(!text.is_empty(), "{field} should be a non-empty string");
    }
}

#[tokio::test]
async fn failing_source_becomes_500_envelope() {
    let app = app(true);
    let res = get(&app, "/api/clues/random").await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body(&res);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Failed to fetch clue"));
    assert_eq!(
        body["details"]["message"],
        json!("connection error: connection refused")
    );
}

#[tokio::test]
async fn unknown_endpoint_is_a_404_envelope() {
    let app = app(false);
    let res = get(&app, "/api/nope").await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body(&res);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Endpoint not found"));
    assert_eq!(body["details"]["path"], json!("/api/nope"));
    assert_eq!(body["details"]["method"], json!("GET"));
}

#[tokio::test]
async fn category_path_parameter_reaches_the_source() {
    let app = app(false);
    let res = get(&app, "/api/clues/category/Science").await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(&res)["data"]["clues"][0]["category"], json!("Science"));
}

#[tokio::test]
async fn difficulty_path_parameter_reaches_the_source() {
    let app = app(false);
    let res = get(&app, "/api/clues/difficulty/hard").await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(&res)["data"]["clues"][0]["difficulty"], json!("hard"));
}

#[tokio::test]
async fn invalid_difficulty_surfaces_as_500_envelope() {
    let app = app(false);
    let res = get(&app, "/api/clues/difficulty/extreme").await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body(&res);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["details"]["message"],
        json!("Invalid difficulty: extreme")
    );
}

#[tokio::test]
async fn search_without_keyword_is_a_400() {
    let app = app(false);
    let res = get(&app, "/api/clues/search").await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body(&res)["error"],
        json!("Missing required query parameter: q")
    );
}

#[tokio::test]
async fn search_capability_gap_is_reported() {
    let app = app(false);
    let res = get(&app, "/api/clues/search?q=washington").await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body(&res)["details"]["message"],
        json!("search is not supported by this source")
    );
}
