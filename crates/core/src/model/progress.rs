use serde::Serialize;

//
// ─── SEARCH PHASE ─────────────────────────────────────────────────────────────
//

/// Coarse pipeline phase derived from a progress label.
///
/// The backend announces steps as free-text labels. Matching on that text is
/// kept behind [`SearchPhase::classify`] so a new or reworded label degrades
/// to `Other` instead of breaking callers that key display off the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    OptimizingQuery,
    Routing,
    KnowledgeBase,
    RelevanceGrading,
    WebSearch,
    ArxivSearch,
    Summarizing,
    Saving,
    Finalizing,
    /// Unrecognized label.
    Other,
}

impl SearchPhase {
    /// Classifies a backend progress label into a phase.
    ///
    /// Labels are matched exactly against the set the backend is known to
    /// emit; anything else falls back to `Other`.
    #[must_use]
    pub fn classify(label: &str) -> Self {
        match label {
            "✍️ Optimizing query..." => Self::OptimizingQuery,
            "🧭 Analyzing and routing for external search..." => Self::Routing,
            "🔎 Searching internal knowledge base..." => Self::KnowledgeBase,
            "⚖️ Grading document relevance..." => Self::RelevanceGrading,
            "🌐 Searching the web..." => Self::WebSearch,
            "🔬 Searching ArXiv..." => Self::ArxivSearch,
            "⚙️ Preparing to process new information..."
            | "📄 Summarizing new information..."
            | "📄 Processing and summarizing web results..."
            | "📚 Processing and summarizing scientific documents..." => Self::Summarizing,
            "💾 Saving new information to database..." => Self::Saving,
            "✅ Preparing final answer..." => Self::Finalizing,
            _ => Self::Other,
        }
    }
}

//
// ─── PROGRESS LOG ─────────────────────────────────────────────────────────────
//

/// A single intermediate notification from the search pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    pub sequence: u32,
    pub label: String,
    pub phase: SearchPhase,
}

/// Append-only log of progress events for one search session.
///
/// Sequence numbers are assigned by the log itself, so they are strictly
/// increasing, gapless, and start at zero regardless of what the backend
/// sends. Events are never mutated or removed once appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressLog {
    events: Vec<ProgressEvent>,
}

impl ProgressLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event with the next sequence number and returns it.
    pub fn append(&mut self, label: impl Into<String>) -> &ProgressEvent {
        let label = label.into();
        let event = ProgressEvent {
            sequence: u32::try_from(self.events.len()).unwrap_or(u32::MAX),
            phase: SearchPhase::classify(&label),
            label,
        };
        self.events.push(event);
        self.events.last().expect("log cannot be empty after push")
    }

    #[must_use]
    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the most recent event, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&ProgressEvent> {
        self.events.last()
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_is_gapless_and_zero_based() {
        let mut log = ProgressLog::new();
        log.append("🌐 Searching the web...");
        log.append("anything");
        log.append("anything else");

        let sequences: Vec<u32> = log.events().iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
    }

    #[test]
    fn known_labels_classify_to_phases() {
        assert_eq!(
            SearchPhase::classify("✍️ Optimizing query..."),
            SearchPhase::OptimizingQuery
        );
        assert_eq!(
            SearchPhase::classify("🔬 Searching ArXiv..."),
            SearchPhase::ArxivSearch
        );
        assert_eq!(
            SearchPhase::classify("✅ Preparing final answer..."),
            SearchPhase::Finalizing
        );
    }

    #[test]
    fn unknown_label_falls_back_to_other() {
        assert_eq!(SearchPhase::classify("🆕 Doing a new thing..."), SearchPhase::Other);
        let mut log = ProgressLog::new();
        let event = log.append("🆕 Doing a new thing...");
        assert_eq!(event.phase, SearchPhase::Other);
    }

    #[test]
    fn latest_tracks_the_last_append() {
        let mut log = ProgressLog::new();
        assert!(log.latest().is_none());
        log.append("first");
        log.append("second");
        assert_eq!(log.latest().map(|e| e.label.as_str()), Some("second"));
    }
}
