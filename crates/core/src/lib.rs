#![forbid(unsafe_code)]

pub mod model;
pub mod segment;
pub mod time;

pub use time::Clock;

pub use model::{
    CategorizedFeedback, FailureKind, FeedbackError, FeedbackRecord, Passage, PassageError,
    ProgressEvent, ProgressLog, QueryError, ResultSet, Score, ScoreBand, ScoreHistory,
    SearchFailure, SearchPhase, SearchQuery, SentenceUnit, SessionOutcome,
};
pub use segment::segment;
