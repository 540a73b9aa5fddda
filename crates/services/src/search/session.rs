use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use coach_core::model::{ProgressLog, ResultSet, SearchFailure, SearchQuery, SessionOutcome};
use coach_core::time::Clock;

use super::channel::{Frame, SearchChannel};

//
// ─── WIRE PROTOCOL ────────────────────────────────────────────────────────────
//

/// Inbound event, tagged by its `type` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireEvent {
    Step { message: String },
    Result { data: WireResult },
    Error { message: String },
}

#[derive(Debug, Deserialize)]
struct WireResult {
    #[serde(rename = "final")]
    final_stage: WireFinal,
}

#[derive(Debug, Deserialize)]
struct WireFinal {
    #[serde(default)]
    final_results: Vec<String>,
}

//
// ─── SESSION ──────────────────────────────────────────────────────────────────
//

/// Lifecycle position of a search session.
///
/// `Succeeded` and `Failed` are terminal and imply the channel has already
/// been released. `Closed` is the end state of a session that never recorded
/// an outcome: an external abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Connecting,
    Streaming,
    Succeeded,
    Failed,
    Closed,
}

/// One bounded streaming interaction with the search backend.
///
/// A session is created per query and never reused: it opens exactly one
/// channel, accumulates progress events in arrival order, records exactly one
/// terminal outcome, and guarantees the channel is released on every exit
/// path (terminal message, transport failure, abort, or drop).
pub struct SearchSession {
    query: SearchQuery,
    state: SearchState,
    progress: ProgressLog,
    outcome: SessionOutcome,
    inbound: Option<mpsc::Receiver<Frame>>,
    clock: Clock,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl SearchSession {
    /// Opens the channel, sends the query, and returns the streaming session.
    ///
    /// A connect failure does not prevent construction: the session comes
    /// back already `Failed` with a transport failure on its outcome, which
    /// is how connection errors are surfaced to callers.
    pub async fn start(channel: &dyn SearchChannel, query: SearchQuery, clock: Clock) -> Self {
        let mut session = Self {
            query,
            state: SearchState::Connecting,
            progress: ProgressLog::new(),
            outcome: SessionOutcome::Pending,
            inbound: None,
            clock,
            started_at: clock.now(),
            finished_at: None,
        };

        match channel.open(session.query.as_str()).await {
            Ok(inbound) => {
                session.inbound = Some(inbound);
                session.state = SearchState::Streaming;
            }
            Err(err) => {
                warn!(error = %err, "search channel failed to open");
                session.fail(SearchFailure::transport());
            }
        }
        session
    }

    /// Receives and applies the next inbound event.
    ///
    /// Returns `true` while the session is still streaming and more events
    /// are expected. A channel that closes before delivering a terminal
    /// message counts as a transport failure.
    pub async fn process_next(&mut self) -> bool {
        let frame = match self.inbound.as_mut() {
            Some(inbound) => inbound.recv().await,
            None => return false,
        };

        match frame {
            Some(frame) => {
                self.handle_frame(&frame);
                self.is_active()
            }
            None => {
                self.fail(SearchFailure::transport());
                false
            }
        }
    }

    /// Drains inbound events until the session leaves the streaming state.
    pub async fn run_to_completion(&mut self) {
        while self.process_next().await {}
    }

    /// Applies a single inbound frame to the state machine.
    ///
    /// Progress events append to the log without a state change; a terminal
    /// event records the outcome and releases the channel. Frames arriving
    /// after a terminal outcome are logged and ignored, and an unparseable
    /// frame is a protocol failure.
    pub fn handle_frame(&mut self, frame: &str) {
        if self.outcome.is_terminal() {
            warn!(frame, "ignoring message after terminal outcome");
            return;
        }

        match serde_json::from_str::<WireEvent>(frame) {
            Ok(WireEvent::Step { message }) => {
                self.progress.append(message);
            }
            Ok(WireEvent::Result { data }) => {
                let passages = data.final_stage.final_results;
                if passages.is_empty() {
                    self.fail(SearchFailure::no_content());
                } else {
                    self.succeed(ResultSet::new(passages));
                }
            }
            Ok(WireEvent::Error { message }) => {
                self.fail(SearchFailure::backend(message));
            }
            Err(_) => {
                self.fail(SearchFailure::protocol(frame));
            }
        }
    }

    /// Aborts an active session: the channel is released and the outcome
    /// stays `Pending`. Callers must treat this as "no answer", not an error.
    /// No-op unless the session is connecting or streaming.
    pub fn abort(&mut self) {
        if !self.is_active() {
            return;
        }
        debug!("search session aborted");
        self.state = SearchState::Closed;
        self.finished_at = Some(self.clock.now());
        self.inbound = None;
    }

    #[must_use]
    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressLog {
        &self.progress
    }

    #[must_use]
    pub fn outcome(&self) -> &SessionOutcome {
        &self.outcome
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// True while the session may still receive events.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, SearchState::Connecting | SearchState::Streaming)
    }

    /// True once the channel has been released.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inbound.is_none()
    }

    fn succeed(&mut self, results: ResultSet) {
        self.finish(SessionOutcome::Succeeded(results), SearchState::Succeeded);
    }

    fn fail(&mut self, failure: SearchFailure) {
        self.finish(SessionOutcome::Failed(failure), SearchState::Failed);
    }

    // Records the single terminal outcome and releases the channel. A second
    // terminal is log-worthy, never fatal.
    fn finish(&mut self, outcome: SessionOutcome, state: SearchState) {
        if self.outcome.is_terminal() {
            warn!("duplicate terminal outcome ignored");
            return;
        }
        self.outcome = outcome;
        self.state = state;
        self.finished_at = Some(self.clock.now());
        self.inbound = None;
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
