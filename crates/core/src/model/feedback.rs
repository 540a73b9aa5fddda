use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur while building feedback values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("score {0} is out of the 0-100 range")]
    ScoreOutOfRange(u8),
}

//
// ─── SCORE ────────────────────────────────────────────────────────────────────
//

/// A grading score in the range 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Score(u8);

impl Score {
    /// Validates and wraps a raw score.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError::ScoreOutOfRange` for values above 100.
    pub fn new(value: u8) -> Result<Self, FeedbackError> {
        if value > 100 {
            return Err(FeedbackError::ScoreOutOfRange(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns the display band for this score.
    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_value(self.0)
    }
}

/// Coarse qualitative bucket for a score, used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// 85..=100
    Good,
    /// 50..85
    Ok,
    /// 0..50
    Bad,
}

impl ScoreBand {
    fn for_value(value: u8) -> Self {
        if value >= 85 {
            Self::Good
        } else if value >= 50 {
            Self::Ok
        } else {
            Self::Bad
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Ok => "ok",
            Self::Bad => "bad",
        }
    }
}

//
// ─── FEEDBACK RECORD ──────────────────────────────────────────────────────────
//

/// Per-category commentary from the grader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorizedFeedback {
    pub grammar: String,
    pub vocabulary: String,
    pub nuance: String,
}

/// Graded feedback for one submitted translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackRecord {
    score: Score,
    categorized: CategorizedFeedback,
    suggestions: Vec<String>,
}

impl FeedbackRecord {
    #[must_use]
    pub fn new(score: Score, categorized: CategorizedFeedback, suggestions: Vec<String>) -> Self {
        Self {
            score,
            categorized,
            suggestions,
        }
    }

    #[must_use]
    pub fn score(&self) -> Score {
        self.score
    }

    #[must_use]
    pub fn categorized(&self) -> &CategorizedFeedback {
        &self.categorized
    }

    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}

//
// ─── SCORE HISTORY ────────────────────────────────────────────────────────────
//

/// Sparse map from sentence index to the score of its last graded submission.
///
/// Only indices that have been submitted appear. The history lives as long as
/// its practice session; a new passage starts from an empty history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreHistory {
    scores: HashMap<usize, Score>,
}

impl ScoreHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the score for a sentence, replacing any earlier one.
    pub fn record(&mut self, index: usize, score: Score) {
        self.scores.insert(index, score);
    }

    #[must_use]
    pub fn score(&self, index: usize) -> Option<Score> {
        self.scores.get(&index).copied()
    }

    /// Returns the band for a sentence, or `None` if it was never submitted.
    #[must_use]
    pub fn band(&self, index: usize) -> Option<ScoreBand> {
        self.score(index).map(|score| score.band())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
