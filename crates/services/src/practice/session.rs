use chrono::{DateTime, Utc};
use tracing::debug;

use coach_core::model::{FeedbackRecord, Passage, ScoreHistory, SentenceUnit};
use coach_core::time::Clock;

use crate::error::PracticeError;

use super::grader::{GradingRequest, TranslationGrader};

/// Sentence-by-sentence translation practice over one passage.
///
/// Holds the segmented sentence units, the focused-sentence pointer, the
/// in-progress translation buffer, and the per-sentence score history. A
/// session is bound to its passage for life; picking a new passage means a
/// new session and an empty history.
///
/// At most one grading request may be outstanding. The submission cycle is
/// split into [`begin_submission`](Self::begin_submission) /
/// [`record_feedback`](Self::record_feedback) /
/// [`submission_failed`](Self::submission_failed) so the exclusion holds
/// across suspension points; [`submit`](Self::submit) composes the three.
pub struct PracticeSession {
    passage: Passage,
    sentences: Vec<SentenceUnit>,
    current: usize,
    translation: String,
    scores: ScoreHistory,
    last_feedback: Option<FeedbackRecord>,
    // Index of the sentence whose grading request is outstanding.
    in_flight: Option<usize>,
    started_at: DateTime<Utc>,
}

impl PracticeSession {
    /// Builds a session around a selected passage.
    ///
    /// A passage without terminal punctuation yields zero sentences; the
    /// session still constructs, but has no current unit and rejects
    /// submissions, so callers can show their unsegmentable-passage message.
    #[must_use]
    pub fn new(passage: Passage, clock: Clock) -> Self {
        let sentences = passage.sentences();
        Self {
            passage,
            sentences,
            current: 0,
            translation: String::new(),
            scores: ScoreHistory::new(),
            last_feedback: None,
            in_flight: None,
            started_at: clock.now(),
        }
    }

    #[must_use]
    pub fn passage(&self) -> &Passage {
        &self.passage
    }

    #[must_use]
    pub fn sentences(&self) -> &[SentenceUnit] {
        &self.sentences
    }

    /// Index of the focused sentence, or `None` for a zero-sentence passage.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        if self.sentences.is_empty() {
            None
        } else {
            Some(self.current)
        }
    }

    #[must_use]
    pub fn current_unit(&self) -> Option<&SentenceUnit> {
        self.sentences.get(self.current)
    }

    #[must_use]
    pub fn translation(&self) -> &str {
        &self.translation
    }

    /// Replaces the in-progress translation buffer.
    pub fn set_translation(&mut self, text: impl Into<String>) {
        self.translation = text.into();
    }

    #[must_use]
    pub fn scores(&self) -> &ScoreHistory {
        &self.scores
    }

    #[must_use]
    pub fn last_feedback(&self) -> Option<&FeedbackRecord> {
        self.last_feedback.as_ref()
    }

    #[must_use]
    pub fn grading_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Moves focus by `delta` sentences.
    ///
    /// Silently does nothing when the target index is out of bounds.
    /// Moving focus clears the translation buffer and the displayed
    /// feedback; recorded scores are kept.
    pub fn navigate(&mut self, delta: i32) {
        if self.sentences.is_empty() {
            return;
        }
        let Some(target) = self.current.checked_add_signed(delta as isize) else {
            return;
        };
        if target >= self.sentences.len() {
            return;
        }
        self.current = target;
        self.translation.clear();
        self.last_feedback = None;
    }

    /// Validates a submission and marks its grading request outstanding.
    ///
    /// Returns the wire payload for the grading collaborator. The focused
    /// sentence index is captured here, so feedback lands on the sentence
    /// that was actually submitted even if the user navigates while the
    /// request is in flight.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::RequestInFlight` if a request is already
    /// outstanding, `PracticeError::EmptyTranslation` for a blank
    /// submission, and `PracticeError::NoSentences` when the passage has no
    /// gradable sentences.
    pub fn begin_submission(&mut self, translation: &str) -> Result<GradingRequest, PracticeError> {
        if self.in_flight.is_some() {
            return Err(PracticeError::RequestInFlight);
        }
        if translation.trim().is_empty() {
            return Err(PracticeError::EmptyTranslation);
        }
        let unit = self.current_unit().ok_or(PracticeError::NoSentences)?;

        let request = GradingRequest {
            original_passage: self.passage.text().to_string(),
            current_sentence: unit.text.clone(),
            user_translation: translation.to_string(),
        };
        self.in_flight = Some(unit.index);
        self.translation = translation.to_string();
        Ok(request)
    }

    /// Completes the outstanding request with the grader's feedback.
    ///
    /// Records the score against the submitted sentence and keeps the full
    /// record for display.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::NoPendingRequest` if no request is in flight.
    pub fn record_feedback(
        &mut self,
        feedback: FeedbackRecord,
    ) -> Result<&FeedbackRecord, PracticeError> {
        let index = self.in_flight.take().ok_or(PracticeError::NoPendingRequest)?;
        self.scores.record(index, feedback.score());
        debug!(index, score = feedback.score().value(), "feedback recorded");
        Ok(self.last_feedback.insert(feedback))
    }

    /// Clears the outstanding request after a failed grading attempt.
    ///
    /// Score history is untouched, so the submission can simply be retried.
    pub fn submission_failed(&mut self) {
        self.in_flight = None;
    }

    /// Submits a translation for the focused sentence and waits for feedback.
    ///
    /// # Errors
    ///
    /// Propagates the validation errors of
    /// [`begin_submission`](Self::begin_submission); a collaborator failure
    /// surfaces as `PracticeError::Grader` with score state unchanged.
    pub async fn submit(
        &mut self,
        grader: &dyn TranslationGrader,
        translation: &str,
    ) -> Result<&FeedbackRecord, PracticeError> {
        let request = self.begin_submission(translation)?;
        match grader.grade(&request).await {
            Ok(feedback) => self.record_feedback(feedback),
            Err(err) => {
                self.submission_failed();
                Err(err.into())
            }
        }
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use coach_core::model::{CategorizedFeedback, Score, ScoreBand};
    use coach_core::time::fixed_clock;

    use crate::error::GraderError;

    fn session(passage: &str) -> PracticeSession {
        PracticeSession::new(Passage::new(passage).unwrap(), fixed_clock())
    }

    fn feedback(score: u8) -> FeedbackRecord {
        FeedbackRecord::new(
            Score::new(score).unwrap(),
            CategorizedFeedback {
                grammar: "g".to_string(),
                vocabulary: "v".to_string(),
                nuance: "n".to_string(),
            },
            vec!["s".to_string()],
        )
    }

    struct FixedGrader {
        score: u8,
    }

    #[async_trait]
    impl TranslationGrader for FixedGrader {
        async fn grade(&self, _request: &GradingRequest) -> Result<FeedbackRecord, GraderError> {
            Ok(feedback(self.score))
        }
    }

    struct UnreachableGrader;

    #[async_trait]
    impl TranslationGrader for UnreachableGrader {
        async fn grade(&self, _request: &GradingRequest) -> Result<FeedbackRecord, GraderError> {
            Err(GraderError::HttpStatus(
                reqwest::StatusCode::SERVICE_UNAVAILABLE,
            ))
        }
    }

    #[test]
    fn starts_focused_on_the_first_sentence() {
        let session = session("One. Two. Three.");
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(session.current_unit().map(|u| u.text.as_str()), Some("One."));
        assert_eq!(session.sentences().len(), 3);
    }

    #[test]
    fn unsegmentable_passage_has_no_current_unit() {
        let session = session("no punctuation at all");
        assert!(session.current_index().is_none());
        assert!(session.current_unit().is_none());
    }

    #[test]
    fn navigation_is_bounded_and_clears_per_sentence_state() {
        let mut session = session("One. Two.");
        session.set_translation("draft");

        session.navigate(-1);
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(session.translation(), "draft");

        session.navigate(1);
        assert_eq!(session.current_index(), Some(1));
        assert_eq!(session.translation(), "");

        session.navigate(1);
        assert_eq!(session.current_index(), Some(1));
    }

    #[test]
    fn navigation_on_empty_passage_is_a_noop() {
        let mut session = session("nothing to split");
        session.navigate(1);
        assert!(session.current_index().is_none());
    }

    #[test]
    fn begin_submission_rejects_blank_and_concurrent_requests() {
        let mut session = session("One. Two.");

        let err = session.begin_submission("   ").unwrap_err();
        assert!(matches!(err, PracticeError::EmptyTranslation));

        let request = session.begin_submission("first try").unwrap();
        assert_eq!(request.current_sentence, "One.");
        assert_eq!(request.user_translation, "first try");

        let err = session.begin_submission("second try").unwrap_err();
        assert!(matches!(err, PracticeError::RequestInFlight));
        assert!(session.grading_in_flight());
    }

    #[test]
    fn zero_sentence_passage_rejects_submissions() {
        let mut session = session("no terminal punctuation");
        let err = session.begin_submission("anything").unwrap_err();
        assert!(matches!(err, PracticeError::NoSentences));
    }

    #[test]
    fn feedback_lands_on_the_submitted_sentence_despite_navigation() {
        let mut session = session("One. Two.");
        session.begin_submission("for sentence zero").unwrap();

        // User moves on before the grader answers.
        session.navigate(1);

        session.record_feedback(feedback(92)).unwrap();
        assert_eq!(session.scores().band(0), Some(ScoreBand::Good));
        assert!(session.scores().band(1).is_none());
        assert!(!session.grading_in_flight());
    }

    #[test]
    fn record_feedback_without_a_request_is_an_error() {
        let mut session = session("One.");
        let err = session.record_feedback(feedback(70)).unwrap_err();
        assert!(matches!(err, PracticeError::NoPendingRequest));
    }

    #[tokio::test]
    async fn submit_records_score_and_returns_feedback() {
        let mut session = session("One. Two.");
        let record = session.submit(&FixedGrader { score: 60 }, "my try").await.unwrap();
        assert_eq!(record.score().value(), 60);

        assert_eq!(session.scores().band(0), Some(ScoreBand::Ok));
        assert_eq!(session.last_feedback().map(|f| f.score().value()), Some(60));
        assert_eq!(session.translation(), "my try");
    }

    #[tokio::test]
    async fn failed_submission_leaves_history_untouched_and_is_retryable() {
        let mut session = session("One.");

        let err = session.submit(&UnreachableGrader, "my try").await.unwrap_err();
        assert!(matches!(err, PracticeError::Grader(_)));
        assert!(session.scores().is_empty());
        assert!(!session.grading_in_flight());

        // Retry goes through once the collaborator recovers.
        let record = session.submit(&FixedGrader { score: 30 }, "my try").await.unwrap();
        assert_eq!(record.score().band(), ScoreBand::Bad);
        assert_eq!(session.scores().band(0), Some(ScoreBand::Bad));
    }

    #[tokio::test]
    async fn resubmitting_a_sentence_replaces_its_score() {
        let mut session = session("One.");
        session.submit(&FixedGrader { score: 30 }, "rough").await.unwrap();
        session.submit(&FixedGrader { score: 92 }, "polished").await.unwrap();
        assert_eq!(session.scores().band(0), Some(ScoreBand::Good));
        assert_eq!(session.scores().len(), 1);
    }
}
