use std::fmt;
use thiserror::Error;

/// Errors that can occur while building a search query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("search query must not be empty")]
    Empty,
}

/// A validated user-submitted search query.
///
/// Trimmed on construction and guaranteed non-empty. Owned by a search
/// session for its whole lifetime; a new query always means a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Builds a query from raw user input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Empty` if the input is empty or whitespace-only.
    pub fn new(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the query text as sent to the backend.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
