//! Failure taxonomy for trivia sources.
//!
//! Routing-level failures (unknown endpoint, a handler returning `Err`) are
//! expressed as HTTP [`Response`](crate::Response) values, not as variants
//! here. This type covers everything that can go wrong between a handler
//! and the data backing it.

use thiserror::Error;

/// Errors produced by a [`TriviaSource`](crate::source::TriviaSource).
#[derive(Debug, Error)]
pub enum TriviaError {
    /// The upstream could not be reached, timed out, or answered with a
    /// non-2xx status.
    #[error("connection error: {0}")]
    SourceUnavailable(String),

    /// The upstream answered, but the payload was not parseable JSON or did
    /// not have the expected shape.
    #[error("invalid response from API: {0}")]
    InvalidResponse(String),

    /// The upstream answered correctly but returned zero usable questions.
    #[error("no questions returned")]
    NoData,

    /// A question survived normalization with an empty clue or answer.
    #[error("malformed clue: {0}")]
    MalformedClue(String),

    /// The caller asked for something no source supports, e.g. an unknown
    /// difficulty level.
    #[error("{0}")]
    InvalidArgument(String),

    /// A capability gap in one specific source variant, not a defect.
    #[error("{0}")]
    NotImplemented(&'static str),
}
