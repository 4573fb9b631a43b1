//! Local Jeopardy corpus adapter.
//!
//! Reads a JSON question file once at construction and serves from memory;
//! no network, no writers after load, so concurrent readers never race.
//! Difficulty is derived from the Jeopardy board value using one consistent
//! half-open partition: easy `[100,400)`, medium `[400,800)`, hard `[800,∞)`.

use std::path::Path;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::error::TriviaError;

use super::{Clue, TriviaSource, check_difficulty, decode_html};

const SERVICE_NAME: &str = "Local Jeopardy Database";

/// Category, difficulty, and search results are capped at this many clues.
const MAX_RESULTS: usize = 10;

/// A question as it appears in the corpus file. Field names vary between
/// corpus exports, hence the aliases.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    category: Option<String>,
    #[serde(alias = "clue")]
    question: Option<String>,
    #[serde(alias = "response")]
    answer: Option<String>,
    value: Option<u32>,
    #[serde(alias = "airdate")]
    air_date: Option<String>,
}

/// File-backed source serving a fixed Jeopardy question corpus.
#[derive(Debug)]
pub struct LocalJeopardySource {
    questions: Vec<RawQuestion>,
}

impl LocalJeopardySource {
    /// Loads the whole corpus into memory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, TriviaError> {
        let path = path.as_ref();
        let raw = std::fs::read(path).map_err(|_| {
            TriviaError::SourceUnavailable(format!(
                "Jeopardy data file not found: {}",
                path.display()
            ))
        })?;

        let questions = serde_json::from_slice(&raw).map_err(|_| {
            TriviaError::InvalidResponse("Invalid JSON in Jeopardy data file".into())
        })?;

        Ok(Self { questions })
    }

    /// Number of questions loaded, for startup logging.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    fn normalize(&self, raw: &RawQuestion) -> Result<Clue, TriviaError> {
        Clue {
            category: decode_html(raw.category.as_deref().unwrap_or("General Knowledge")),
            clue: decode_html(raw.question.as_deref().unwrap_or_default()),
            response: decode_html(raw.answer.as_deref().unwrap_or_default()),
            difficulty: derive_difficulty(raw.value.unwrap_or(0)).to_owned(),
            kind: "jeopardy".to_owned(),
            value: raw.value,
            airdate: raw.air_date.clone(),
            source: Some(SERVICE_NAME.to_owned()),
        }
        .validated()
    }

    fn pick_random(&self) -> Result<Clue, TriviaError> {
        let raw = self
            .questions
            .choose(&mut rand::thread_rng())
            .ok_or(TriviaError::NoData)?;
        self.normalize(raw)
    }

    fn collect_matching(
        &self,
        predicate: impl Fn(&RawQuestion) -> bool,
    ) -> Result<Vec<Clue>, TriviaError> {
        self.questions
            .iter()
            .filter(|q| predicate(q))
            .take(MAX_RESULTS)
            .map(|q| self.normalize(q))
            .collect()
    }
}

/// Maps a board value onto the documented difficulty partition.
fn derive_difficulty(value: u32) -> &'static str {
    if value < 400 {
        "easy"
    } else if value < 800 {
        "medium"
    } else {
        "hard"
    }
}

fn value_in_range(difficulty: &str, value: u32) -> bool {
    match difficulty {
        "easy" => (100..400).contains(&value),
        "medium" => (400..800).contains(&value),
        _ => value >= 800,
    }
}

#[async_trait]
impl TriviaSource for LocalJeopardySource {
    async fn random_clue(&self) -> Result<Clue, TriviaError> {
        self.pick_random()
    }

    async fn clues_by_category(&self, category: &str) -> Result<Vec<Clue>, TriviaError> {
        let needle = category.to_lowercase();
        let clues = self.collect_matching(|q| {
            q.category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&needle))
        })?;

        if clues.is_empty() {
            return Err(TriviaError::NoData);
        }
        Ok(clues)
    }

    async fn clues_by_difficulty(&self, difficulty: &str) -> Result<Vec<Clue>, TriviaError> {
        check_difficulty(difficulty)?;

        let clues = self.collect_matching(|q| {
            q.value.is_some_and(|v| value_in_range(difficulty, v))
        })?;

        if clues.is_empty() {
            // No question in the value range; one random clue beats an
            // empty board for the quiz client.
            return Ok(vec![self.pick_random()?]);
        }
        Ok(clues)
    }

    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<Clue>, TriviaError> {
        let needle = keyword.to_lowercase();
        let clues = self
            .questions
            .iter()
            .filter(|q| {
                let haystack = format!(
                    "{} {} {}",
                    q.question.as_deref().unwrap_or_default(),
                    q.answer.as_deref().unwrap_or_default(),
                    q.category.as_deref().unwrap_or_default(),
                );
                haystack.to_lowercase().contains(&needle)
            })
            .take(limit)
            .map(|q| self.normalize(q))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(clues)
    }

    fn name(&self) -> &'static str {
        SERVICE_NAME
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn corpus(json: &str) -> LocalJeopardySource {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        LocalJeopardySource::new(file.path()).unwrap()
    }

    const SAMPLE: &str = r#"[
        {"category": "World Capitals", "question": "This city is the capital of France", "answer": "Paris", "value": 200, "air_date": "1997-03-14"},
        {"category": "World Capitals", "question": "This city is the capital of Japan", "answer": "Tokyo", "value": 600},
        {"category": "Science &amp; Nature", "clue": "He proposed general relativity", "response": "Einstein", "value": 1000, "airdate": "2001-11-02"},
        {"category": "Potent Potables", "question": "A fortified wine from Porto", "answer": "Port", "value": 400}
    ]"#;

    #[test]
    fn missing_file_is_source_unavailable() {
        let err = LocalJeopardySource::new("/nonexistent/questions.json").unwrap_err();
        assert!(matches!(err, TriviaError::SourceUnavailable(_)));
    }

    #[test]
    fn invalid_json_is_invalid_response() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        let err = LocalJeopardySource::new(file.path()).unwrap_err();
        assert!(matches!(err, TriviaError::InvalidResponse(_)));
    }

    #[test]
    fn loads_corpus_and_counts_questions() {
        assert_eq!(corpus(SAMPLE).question_count(), 4);
    }

    #[tokio::test]
    async fn random_clue_is_normalized_and_complete() {
        let clue = corpus(SAMPLE).random_clue().await.unwrap();
        assert!(!clue.clue.is_empty());
        assert!(!clue.response.is_empty());
        assert_eq!(clue.kind, "jeopardy");
        assert_eq!(clue.source.as_deref(), Some(SERVICE_NAME));
    }

    #[tokio::test]
    async fn empty_corpus_has_no_data() {
        let err = corpus("[]").random_clue().await.unwrap_err();
        assert!(matches!(err, TriviaError::NoData));
    }

    #[tokio::test]
    async fn category_match_is_case_insensitive_substring() {
        let clues = corpus(SAMPLE).clues_by_category("capitals").await.unwrap();
        assert_eq!(clues.len(), 2);
        assert!(clues.iter().all(|c| c.category == "World Capitals"));
    }

    #[tokio::test]
    async fn unknown_category_is_no_data() {
        let err = corpus(SAMPLE).clues_by_category("Opera").await.unwrap_err();
        assert!(matches!(err, TriviaError::NoData));
    }

    #[tokio::test]
    async fn alternate_field_names_and_entities_are_normalized() {
        let clues = corpus(SAMPLE).clues_by_category("nature").await.unwrap();
        assert_eq!(clues[0].category, "Science & Nature");
        assert_eq!(clues[0].clue, "He proposed general relativity");
        assert_eq!(clues[0].response, "Einstein");
        assert_eq!(clues[0].airdate.as_deref(), Some("2001-11-02"));
    }

    #[tokio::test]
    async fn difficulty_partition_is_half_open() {
        let source = corpus(SAMPLE);

        let easy = source.clues_by_difficulty("easy").await.unwrap();
        assert_eq!(easy.len(), 1);
        assert_eq!(easy[0].value, Some(200));
        assert_eq!(easy[0].difficulty, "easy");

        // 400 sits in the medium bucket, not easy
        let medium = source.clues_by_difficulty("medium").await.unwrap();
        let values: Vec<_> = medium.iter().map(|c| c.value.unwrap()).collect();
        assert_eq!(values, vec![600, 400]);

        let hard = source.clues_by_difficulty("hard").await.unwrap();
        assert_eq!(hard[0].value, Some(1000));
    }

    #[tokio::test]
    async fn unknown_difficulty_is_invalid_argument() {
        let err = corpus(SAMPLE).clues_by_difficulty("extreme").await.unwrap_err();
        assert!(matches!(err, TriviaError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn empty_difficulty_range_falls_back_to_one_random_clue() {
        let source = corpus(
            r#"[{"category": "C", "question": "Q", "answer": "A", "value": 1000}]"#,
        );
        let clues = source.clues_by_difficulty("easy").await.unwrap();
        assert_eq!(clues.len(), 1);
        assert_eq!(clues[0].response, "A");
    }

    #[tokio::test]
    async fn results_are_capped() {
        let many: Vec<String> = (0..15)
            .map(|i| {
                format!(
                    r#"{{"category": "Capped", "question": "Q{i}", "answer": "A{i}", "value": 200}}"#
                )
            })
            .collect();
        let json = format!("[{}]", many.join(","));
        let clues = corpus(&json).clues_by_category("capped").await.unwrap();
        assert_eq!(clues.len(), 10);
    }

    #[tokio::test]
    async fn search_scans_question_answer_and_category() {
        let source = corpus(SAMPLE);

        let by_answer = source.search("einstein", 10).await.unwrap();
        assert_eq!(by_answer.len(), 1);

        let by_category = source.search("potables", 10).await.unwrap();
        assert_eq!(by_category[0].response, "Port");

        let by_question = source.search("capital of", 1).await.unwrap();
        assert_eq!(by_question.len(), 1); // limit respected
    }
}
