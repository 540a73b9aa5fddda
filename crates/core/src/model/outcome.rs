use serde::Serialize;
use std::fmt;

//
// ─── RESULT SET ───────────────────────────────────────────────────────────────
//

/// Ordered candidate passages produced by a completed search.
///
/// The wire format allows an empty set, but session logic never records an
/// empty set as a success; see [`SessionOutcome`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSet(Vec<String>);

impl ResultSet {
    #[must_use]
    pub fn new(passages: Vec<String>) -> Self {
        Self(passages)
    }

    #[must_use]
    pub fn passages(&self) -> &[String] {
        &self.0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

//
// ─── FAILURE ──────────────────────────────────────────────────────────────────
//

/// Why a search session failed.
///
/// The outcome keeps a single `Failed` variant, but the payload records which
/// class of failure produced it so callers can distinguish "nothing found"
/// from backend and transport errors without parsing the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The pipeline finished but produced no passages.
    NoContent,
    /// The backend reported an explicit error.
    Backend,
    /// The channel failed or closed before a terminal message.
    Transport,
    /// An inbound payload could not be understood.
    Protocol,
}

/// Terminal failure of a search session, with a user-presentable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchFailure {
    kind: FailureKind,
    message: String,
}

impl SearchFailure {
    #[must_use]
    pub fn no_content() -> Self {
        Self {
            kind: FailureKind::NoContent,
            message: "The process finished, but no relevant content was found or generated."
                .to_string(),
        }
    }

    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Backend,
            message: format!("An error occurred: {}", message.into()),
        }
    }

    #[must_use]
    pub fn transport() -> Self {
        Self {
            kind: FailureKind::Transport,
            message: "Connection failed. Please ensure the backend is running.".to_string(),
        }
    }

    #[must_use]
    pub fn protocol(detail: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Protocol,
            message: format!("Received an unrecognized message from the backend: {}", detail.into()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

//
// ─── OUTCOME ──────────────────────────────────────────────────────────────────
//

/// Single-assignment terminal result of a search session.
///
/// `Pending` until exactly one terminal value is recorded. An aborted session
/// stays `Pending` forever: no answer, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    #[default]
    Pending,
    Succeeded(ResultSet),
    Failed(SearchFailure),
}

impl SessionOutcome {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    #[must_use]
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns the result set of a succeeded session.
    #[must_use]
    pub fn result_set(&self) -> Option<&ResultSet> {
        match self {
            Self::Succeeded(results) => Some(results),
            _ => None,
        }
    }

    /// Returns the failure of a failed session.
    #[must_use]
    pub fn failure(&self) -> Option<&SearchFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_accessors_match_variants() {
        let pending = SessionOutcome::Pending;
        assert!(pending.is_pending());
        assert!(!pending.is_terminal());

        let ok = SessionOutcome::Succeeded(ResultSet::new(vec!["a".into()]));
        assert!(ok.is_succeeded());
        assert_eq!(ok.result_set().map(ResultSet::len), Some(1));

        let failed = SessionOutcome::Failed(SearchFailure::no_content());
        assert!(failed.is_failed());
        assert_eq!(failed.failure().map(SearchFailure::kind), Some(FailureKind::NoContent));
    }

    #[test]
    fn failures_carry_presentable_messages() {
        let failure = SearchFailure::backend("model overloaded");
        assert_eq!(failure.kind(), FailureKind::Backend);
        assert_eq!(failure.to_string(), "An error occurred: model overloaded");

        assert!(SearchFailure::transport().message().starts_with("Connection failed"));
    }
}
