//! Trivia sources: interchangeable adapters that supply normalized clues.
//!
//! Each adapter maps its provider's raw field names onto the canonical
//! [`Clue`] shape, HTML-entity-decodes every text field, and refuses to
//! emit a clue whose question or answer decoded to nothing.

mod local;
mod open_trivia;

pub use local::LocalJeopardySource;
pub use open_trivia::OpenTriviaSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::TriviaError;

/// The difficulty levels every source understands.
pub const DIFFICULTIES: [&str; 3] = ["easy", "medium", "hard"];

/// A normalized trivia question.
///
/// `clue` and `response` are guaranteed non-empty and free of HTML entities
/// on every value a source returns. `value` and `airdate` only appear on
/// Jeopardy-style corpora and are omitted from JSON when absent.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Clue {
    pub category: String,
    pub clue: String,
    pub response: String,
    pub difficulty: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airdate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Clue {
    /// Enforces the non-empty invariant. A clue that fails here is never
    /// returned to a caller; the producing operation fails instead.
    pub(crate) fn validated(self) -> Result<Self, TriviaError> {
        if self.clue.trim().is_empty() {
            return Err(TriviaError::MalformedClue("empty question text".into()));
        }
        if self.response.trim().is_empty() {
            return Err(TriviaError::MalformedClue("empty answer text".into()));
        }
        Ok(self)
    }
}

/// Decodes HTML entities and numeric character references into UTF-8 text.
///
/// Upstream APIs ship text like `"Q&amp;A"` or `"&#039;"`; clients get
/// `"Q&A"` and `"'"`.
pub(crate) fn decode_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Rejects difficulties outside `easy|medium|hard` with `InvalidArgument`.
pub(crate) fn check_difficulty(difficulty: &str) -> Result<(), TriviaError> {
    if DIFFICULTIES.contains(&difficulty) {
        Ok(())
    } else {
        Err(TriviaError::InvalidArgument(format!(
            "Invalid difficulty: {difficulty}"
        )))
    }
}

/// One backing origin of trivia questions.
///
/// Implementations are stateless after construction and shared across
/// requests as `Arc<dyn TriviaSource>`. To plug in your own provider,
/// implement the trait and map your API's fields onto [`Clue`]:
///
/// ```
/// use async_trait::async_trait;
/// use quizd::TriviaError;
/// use quizd::source::{Clue, TriviaSource};
///
/// struct MyTriviaApi;
///
/// #[async_trait]
/// impl TriviaSource for MyTriviaApi {
///     async fn random_clue(&self) -> Result<Clue, TriviaError> {
///         // GET https://your-api.example/random, then map its fields:
///         Ok(Clue {
///             category: "General Knowledge".into(),
///             clue: "…".into(),
///             response: "…".into(),
///             difficulty: "medium".into(),
///             kind: "multiple".into(),
///             value: None,
///             airdate: None,
///             source: Some(self.name().into()),
///         })
///     }
///
///     async fn clues_by_category(&self, _category: &str) -> Result<Vec<Clue>, TriviaError> {
///         Err(TriviaError::NotImplemented("category filtering is not supported"))
///     }
///
///     async fn clues_by_difficulty(&self, _difficulty: &str) -> Result<Vec<Clue>, TriviaError> {
///         Err(TriviaError::NotImplemented("difficulty filtering is not supported"))
///     }
///
///     fn name(&self) -> &'static str {
///         "My Trivia API"
///     }
/// }
/// ```
#[async_trait]
pub trait TriviaSource: Send + Sync {
    /// Fetches one random clue.
    async fn random_clue(&self) -> Result<Clue, TriviaError>;

    /// Fetches clues whose category matches `category`.
    async fn clues_by_category(&self, category: &str) -> Result<Vec<Clue>, TriviaError>;

    /// Fetches clues of the given difficulty (`easy|medium|hard`).
    async fn clues_by_difficulty(&self, difficulty: &str) -> Result<Vec<Clue>, TriviaError>;

    /// Keyword search across question, answer, and category text. Optional
    /// capability; sources without it report the gap.
    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<Clue>, TriviaError> {
        let _ = (keyword, limit);
        Err(TriviaError::NotImplemented("search is not supported by this source"))
    }

    /// Human-readable source name, attached to every clue for provenance.
    fn name(&self) -> &'static str;
}
