use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use coach_core::model::FailureKind;
use coach_core::time::fixed_clock;
use services::{ChannelError, CoachService, Frame, SearchChannel, SearchState};

struct ScriptedChannel {
    frames: Vec<Frame>,
    hold_open: bool,
    keepalive: Mutex<Option<mpsc::Sender<Frame>>>,
}

impl ScriptedChannel {
    fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            hold_open: false,
            keepalive: Mutex::new(None),
        }
    }

    fn held_open(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            hold_open: true,
            keepalive: Mutex::new(None),
        }
    }

    fn sender_is_closed(&self) -> bool {
        self.keepalive
            .lock()
            .unwrap()
            .as_ref()
            .is_none_or(|tx| tx.is_closed())
    }
}

#[async_trait]
impl SearchChannel for ScriptedChannel {
    async fn open(&self, _query: &str) -> Result<mpsc::Receiver<Frame>, ChannelError> {
        let (tx, rx) = mpsc::channel(self.frames.len().max(1) + 1);
        for frame in &self.frames {
            tx.try_send(frame.clone()).expect("buffer sized for script");
        }
        if self.hold_open {
            *self.keepalive.lock().unwrap() = Some(tx);
        }
        Ok(rx)
    }
}

struct NoGrader;

#[async_trait]
impl services::TranslationGrader for NoGrader {
    async fn grade(
        &self,
        _request: &services::GradingRequest,
    ) -> Result<coach_core::model::FeedbackRecord, services::GraderError> {
        Err(services::GraderError::HttpStatus(
            reqwest::StatusCode::NOT_IMPLEMENTED,
        ))
    }
}

fn step(message: &str) -> String {
    serde_json::json!({"type": "step", "message": message}).to_string()
}

fn result(passages: &[&str]) -> String {
    serde_json::json!({
        "type": "result",
        "data": {"final": {"final_results": passages}}
    })
    .to_string()
}

fn coach(channel: ScriptedChannel) -> CoachService {
    CoachService::new(fixed_clock(), Arc::new(channel), Arc::new(NoGrader))
}

#[tokio::test]
async fn search_with_results_reaches_a_succeeded_status() {
    let mut coach = coach(ScriptedChannel::new(vec![
        step("✍️ Optimizing query..."),
        step("🌐 Searching the web..."),
        step("📄 Processing and summarizing web results..."),
        result(&["First passage.", "Second passage.", "Third passage."]),
    ]));

    coach.start_search("tell me about rust").await.unwrap();
    coach.run_search().await;

    let status = coach.search_status().unwrap();
    assert!(status.outcome.is_succeeded());
    assert_eq!(status.outcome.result_set().map(|r| r.len()), Some(3));

    let sequences: Vec<u32> = status.progress.iter().map(|e| e.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2]);
}

#[tokio::test]
async fn search_with_zero_results_reaches_a_failed_status() {
    let mut coach = coach(ScriptedChannel::new(vec![
        step("🔎 Searching internal knowledge base..."),
        result(&[]),
    ]));

    coach.start_search("obscure topic").await.unwrap();
    coach.run_search().await;

    let status = coach.search_status().unwrap();
    assert!(status.outcome.is_failed());
    assert_eq!(
        status.outcome.failure().map(|f| f.kind()),
        Some(FailureKind::NoContent)
    );
}

#[tokio::test]
async fn aborted_search_ends_closed_and_pending() {
    let channel = Arc::new(ScriptedChannel::held_open(vec![step(
        "🧭 Analyzing and routing for external search...",
    )]));
    let mut coach = CoachService::new(
        fixed_clock(),
        Arc::clone(&channel) as Arc<dyn SearchChannel>,
        Arc::new(NoGrader),
    );

    coach.start_search("q").await.unwrap();
    assert!(coach.pump_search().await);
    coach.abort_search();

    let status = coach.search_status().unwrap();
    assert_eq!(status.state, SearchState::Closed);
    assert!(status.outcome.is_pending());
    assert_eq!(status.progress.len(), 1);

    // The channel itself was released by the abort.
    assert!(channel.sender_is_closed());
}

#[tokio::test]
async fn selected_passage_flows_into_a_practice_session() {
    let mut coach = coach(ScriptedChannel::new(vec![result(&[
        "Câu một. Câu hai. Câu ba.",
    ])]));

    coach.start_search("q").await.unwrap();
    coach.run_search().await;

    let status = coach.search_status().unwrap();
    let passage = status.outcome.result_set().unwrap().get(0).unwrap().to_string();
    coach.select_passage(&passage).unwrap();

    let practice = coach.practice_status().unwrap();
    assert_eq!(practice.total_sentences, 3);
    assert_eq!(practice.current_index, Some(0));
    assert_eq!(practice.current_sentence.as_deref(), Some("Câu một."));
    assert!(practice.scores.is_empty());
}
