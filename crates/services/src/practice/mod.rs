mod grader;
mod session;

// Public API of the practice subsystem.
pub use crate::error::{GraderError, PracticeError};
pub use grader::{GradingRequest, HttpGrader, TranslationGrader};
pub use session::PracticeSession;
