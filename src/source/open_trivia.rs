//! Open Trivia Database adapter.
//!
//! API documentation: <https://opentdb.com/api_config.php>. The API wraps
//! every payload in a `response_code`; zero means success and the rest map
//! onto a fixed table of failure reasons handled in [`check_payload`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::TriviaError;

use super::{Clue, TriviaSource, check_difficulty, decode_html};

const API_BASE_URL: &str = "https://opentdb.com";
const SERVICE_NAME: &str = "Open Trivia Database";

/// Upstream calls that outlive this are reported as `SourceUnavailable`.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote source backed by the Open Trivia Database HTTP API.
pub struct OpenTriviaSource {
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ApiPayload {
    response_code: i64,
    #[serde(default)]
    results: Vec<RawQuestion>,
}

#[derive(Debug, Default, Deserialize)]
struct RawQuestion {
    category: Option<String>,
    question: Option<String>,
    correct_answer: Option<String>,
    difficulty: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl OpenTriviaSource {
    /// Builds the source with its bounded-timeout HTTP client.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized. This happens at
    /// startup or never.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("quizd/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }

    async fn fetch(&self, path_and_query: &str) -> Result<ApiPayload, TriviaError> {
        let url = format!("{API_BASE_URL}{path_and_query}");
        debug!(%url, "fetching from Open Trivia DB");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TriviaError::SourceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TriviaError::SourceUnavailable(format!(
                "API returned status code: {}",
                status.as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TriviaError::SourceUnavailable(e.to_string()))?;

        serde_json::from_slice(&bytes)
            .map_err(|_| TriviaError::InvalidResponse("Invalid API response structure".into()))
    }
}

impl Default for OpenTriviaSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the documented `response_code` table and the non-empty-results
/// requirement, yielding the usable questions.
fn check_payload(payload: ApiPayload) -> Result<Vec<RawQuestion>, TriviaError> {
    match payload.response_code {
        0 => {}
        1 => return Err(TriviaError::NoData),
        2 => return Err(TriviaError::InvalidResponse("Invalid parameter".into())),
        3 => return Err(TriviaError::InvalidResponse("Token not found".into())),
        4 => return Err(TriviaError::InvalidResponse("Token empty".into())),
        5 => return Err(TriviaError::InvalidResponse("Rate limit exceeded".into())),
        _ => return Err(TriviaError::InvalidResponse("Unknown error".into())),
    }

    if payload.results.is_empty() {
        return Err(TriviaError::NoData);
    }

    Ok(payload.results)
}

fn normalize(raw: RawQuestion) -> Result<Clue, TriviaError> {
    Clue {
        category: decode_html(raw.category.as_deref().unwrap_or("General Knowledge")),
        clue: decode_html(raw.question.as_deref().unwrap_or_default()),
        response: decode_html(raw.correct_answer.as_deref().unwrap_or_default()),
        difficulty: raw.difficulty.unwrap_or_else(|| "medium".to_owned()),
        kind: raw.kind.unwrap_or_else(|| "multiple".to_owned()),
        value: None,
        airdate: None,
        source: Some(SERVICE_NAME.to_owned()),
    }
    .validated()
}

#[async_trait]
impl TriviaSource for OpenTriviaSource {
    async fn random_clue(&self) -> Result<Clue, TriviaError> {
        let payload = self.fetch("/api.php?amount=1").await?;
        let mut results = check_payload(payload)?;
        normalize(results.swap_remove(0))
    }

    async fn clues_by_category(&self, _category: &str) -> Result<Vec<Clue>, TriviaError> {
        // The API keys categories by numeric ID, not name; exposing that
        // needs a name→ID mapping that does not exist yet.
        Err(TriviaError::NotImplemented(
            "Category filtering not yet implemented for Open Trivia DB",
        ))
    }

    async fn clues_by_difficulty(&self, difficulty: &str) -> Result<Vec<Clue>, TriviaError> {
        check_difficulty(difficulty)?;

        let payload = self
            .fetch(&format!("/api.php?amount=10&difficulty={difficulty}"))
            .await?;
        check_payload(payload)?
            .into_iter()
            .map(normalize)
            .collect()
    }

    fn name(&self) -> &'static str {
        SERVICE_NAME
    }
}
