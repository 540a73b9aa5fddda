use chrono::{DateTime, Utc};
use std::sync::Arc;

use coach_core::model::{
    FeedbackRecord, Passage, ProgressEvent, ScoreBand, ScoreHistory, SearchQuery, SessionOutcome,
};
use coach_core::time::Clock;

use crate::config::BackendConfig;
use crate::error::CoachError;
use crate::practice::{HttpGrader, PracticeSession, TranslationGrader};
use crate::search::{HttpSearchChannel, SearchChannel, SearchSession, SearchState};

//
// ─── STATUS PROJECTIONS ───────────────────────────────────────────────────────
//

/// Read-only snapshot of the search side.
///
/// Recomputed from the owned session on demand; never stored.
#[derive(Debug, Clone)]
pub struct SearchStatus {
    pub query: String,
    pub state: SearchState,
    pub progress: Vec<ProgressEvent>,
    pub outcome: SessionOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SearchStatus {
    #[must_use]
    pub fn from_session(session: &SearchSession) -> Self {
        Self {
            query: session.query().as_str().to_string(),
            state: session.state(),
            progress: session.progress().events().to_vec(),
            outcome: session.outcome().clone(),
            started_at: session.started_at(),
            finished_at: session.finished_at(),
        }
    }
}

/// Read-only snapshot of the practice side.
#[derive(Debug, Clone)]
pub struct PracticeStatus {
    pub passage: String,
    pub total_sentences: usize,
    pub current_index: Option<usize>,
    pub current_sentence: Option<String>,
    pub translation: String,
    pub scores: ScoreHistory,
    pub current_band: Option<ScoreBand>,
    pub last_feedback: Option<FeedbackRecord>,
    pub grading_in_flight: bool,
}

impl PracticeStatus {
    #[must_use]
    pub fn from_session(session: &PracticeSession) -> Self {
        let current_index = session.current_index();
        Self {
            passage: session.passage().text().to_string(),
            total_sentences: session.sentences().len(),
            current_index,
            current_sentence: session.current_unit().map(|unit| unit.text.clone()),
            translation: session.translation().to_string(),
            scores: session.scores().clone(),
            current_band: current_index.and_then(|index| session.scores().band(index)),
            last_feedback: session.last_feedback().cloned(),
            grading_in_flight: session.grading_in_flight(),
        }
    }
}

//
// ─── ORCHESTRATOR ─────────────────────────────────────────────────────────────
//

/// Top-level coordinator over the two workflows.
///
/// Owns at most one search session and one practice session at a time, and
/// mediates the hand-off from a completed search's selected passage into a
/// freshly built practice session.
pub struct CoachService {
    clock: Clock,
    channel: Arc<dyn SearchChannel>,
    grader: Arc<dyn TranslationGrader>,
    search: Option<SearchSession>,
    practice: Option<PracticeSession>,
}

impl CoachService {
    #[must_use]
    pub fn new(
        clock: Clock,
        channel: Arc<dyn SearchChannel>,
        grader: Arc<dyn TranslationGrader>,
    ) -> Self {
        Self {
            clock,
            channel,
            grader,
            search: None,
            practice: None,
        }
    }

    /// Builds the service against the HTTP backend from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let config = BackendConfig::from_env();
        Self::new(
            Clock::Default,
            Arc::new(HttpSearchChannel::new(config.clone())),
            Arc::new(HttpGrader::new(config)),
        )
    }

    /// Starts a new search session for the given raw query.
    ///
    /// The previous session, if any, is discarded; its progress and outcome
    /// are gone once replaced.
    ///
    /// # Errors
    ///
    /// Returns `CoachError::SearchActive` while a session is connecting or
    /// streaming, and `CoachError::Query` for an empty query. Neither touches
    /// the running session.
    pub async fn start_search(&mut self, raw_query: &str) -> Result<(), CoachError> {
        if self.search.as_ref().is_some_and(SearchSession::is_active) {
            return Err(CoachError::SearchActive);
        }
        let query = SearchQuery::new(raw_query)?;
        let channel = Arc::clone(&self.channel);
        let session = SearchSession::start(channel.as_ref(), query, self.clock).await;
        self.search = Some(session);
        Ok(())
    }

    /// Processes one inbound search event.
    ///
    /// Returns `true` while the search session is still streaming.
    pub async fn pump_search(&mut self) -> bool {
        match self.search.as_mut() {
            Some(session) => session.process_next().await,
            None => false,
        }
    }

    /// Drives the active search session to its terminal outcome.
    pub async fn run_search(&mut self) {
        if let Some(session) = self.search.as_mut() {
            session.run_to_completion().await;
        }
    }

    /// Aborts the active search session, if one is streaming.
    pub fn abort_search(&mut self) {
        if let Some(session) = self.search.as_mut() {
            session.abort();
        }
    }

    /// Hands a selected passage to a freshly built practice session.
    ///
    /// Always constructs a new session: any score history from a previous
    /// passage is discarded.
    ///
    /// # Errors
    ///
    /// Returns `CoachError::Passage` for an empty selection.
    pub fn select_passage(&mut self, text: &str) -> Result<(), CoachError> {
        let passage = Passage::new(text)?;
        self.practice = Some(PracticeSession::new(passage, self.clock));
        Ok(())
    }

    /// Moves practice focus by `delta` sentences (out-of-bounds is a no-op).
    ///
    /// # Errors
    ///
    /// Returns `CoachError::NoPracticeSession` if no passage is active.
    pub fn navigate_practice(&mut self, delta: i32) -> Result<(), CoachError> {
        let session = self.practice.as_mut().ok_or(CoachError::NoPracticeSession)?;
        session.navigate(delta);
        Ok(())
    }

    /// Submits the user's translation of the focused sentence for grading.
    ///
    /// # Errors
    ///
    /// Returns `CoachError::NoPracticeSession` if no passage is active, and
    /// propagates the practice session's validation and grader errors. A
    /// grader failure leaves score state unchanged.
    pub async fn submit_translation(&mut self, text: &str) -> Result<FeedbackRecord, CoachError> {
        let grader = Arc::clone(&self.grader);
        let session = self.practice.as_mut().ok_or(CoachError::NoPracticeSession)?;
        let record = session.submit(grader.as_ref(), text).await?;
        Ok(record.clone())
    }

    /// Snapshot of the search side, if a session exists.
    #[must_use]
    pub fn search_status(&self) -> Option<SearchStatus> {
        self.search.as_ref().map(SearchStatus::from_session)
    }

    /// Snapshot of the practice side, if a passage is active.
    #[must_use]
    pub fn practice_status(&self) -> Option<PracticeStatus> {
        self.practice.as_ref().map(PracticeStatus::from_session)
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
