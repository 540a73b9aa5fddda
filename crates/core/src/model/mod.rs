mod feedback;
mod outcome;
mod passage;
mod progress;
mod query;

pub use feedback::{
    CategorizedFeedback, FeedbackError, FeedbackRecord, Score, ScoreBand, ScoreHistory,
};
pub use outcome::{FailureKind, ResultSet, SearchFailure, SessionOutcome};
pub use passage::{Passage, PassageError, SentenceUnit};
pub use progress::{ProgressEvent, ProgressLog, SearchPhase};
pub use query::{QueryError, SearchQuery};
