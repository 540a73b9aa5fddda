use thiserror::Error;

use crate::segment;

/// Errors that can occur while selecting a passage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PassageError {
    #[error("selected passage must not be empty")]
    Empty,
}

/// The passage a user picked from a result set for translation practice.
///
/// Immutable once chosen; selecting a different passage means building a new
/// practice session around a new `Passage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage(String);

impl Passage {
    /// Wraps the selected text.
    ///
    /// # Errors
    ///
    /// Returns `PassageError::Empty` if the text is empty or whitespace-only.
    pub fn new(text: impl Into<String>) -> Result<Self, PassageError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(PassageError::Empty);
        }
        Ok(Self(text))
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Splits the passage into gradable sentence units.
    #[must_use]
    pub fn sentences(&self) -> Vec<SentenceUnit> {
        segment::segment(&self.0)
    }
}

/// One independently translatable segment of a passage.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SentenceUnit {
    pub index: usize,
    pub text: String,
}
