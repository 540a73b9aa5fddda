//! Shared error types for the services crate.

use thiserror::Error;

use coach_core::model::{PassageError, QueryError};

/// Errors opening the streaming search channel.
///
/// These cover the connect step only; failures after the channel is open are
/// recorded on the session outcome instead (the session transitions to
/// `Failed`), so they never surface as a `Result` error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChannelError {
    #[error("search backend rejected the stream with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the translation grader client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraderError {
    #[error("grading request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("grading response carried an invalid score: {0}")]
    InvalidScore(u16),
}

/// Errors emitted by `PracticeSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("translation must not be empty")]
    EmptyTranslation,
    #[error("a grading request is already in flight")]
    RequestInFlight,
    #[error("no grading request is in flight")]
    NoPendingRequest,
    #[error("the passage contains no gradable sentences")]
    NoSentences,
    #[error(transparent)]
    Grader(#[from] GraderError),
}

/// Errors emitted by the orchestrator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CoachError {
    #[error("a search session is already running")]
    SearchActive,
    #[error("no practice session is active")]
    NoPracticeSession,
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Passage(#[from] PassageError),
    #[error(transparent)]
    Practice(#[from] PracticeError),
}
