use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use coach_core::model::{CategorizedFeedback, FeedbackRecord, Score};

use crate::config::BackendConfig;
use crate::error::GraderError;

/// Payload sent to the grading collaborator for one submission.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GradingRequest {
    pub original_passage: String,
    pub current_sentence: String,
    pub user_translation: String,
}

/// The grading collaborator: one request, one scored feedback record.
#[async_trait]
pub trait TranslationGrader: Send + Sync {
    /// Grades a single translation.
    ///
    /// # Errors
    ///
    /// Returns `GraderError` when the collaborator is unreachable, rejects
    /// the request, or responds with an unusable payload.
    async fn grade(&self, request: &GradingRequest) -> Result<FeedbackRecord, GraderError>;
}

/// HTTP implementation of [`TranslationGrader`].
pub struct HttpGrader {
    client: Client,
    config: BackendConfig,
}

impl HttpGrader {
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(BackendConfig::from_env())
    }
}

#[async_trait]
impl TranslationGrader for HttpGrader {
    async fn grade(&self, request: &GradingRequest) -> Result<FeedbackRecord, GraderError> {
        let url = self.config.endpoint("feedback");
        let response = self.client.post(url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(GraderError::HttpStatus(response.status()));
        }

        let body: FeedbackResponse = response.json().await?;
        body.feedback_data.into_record()
    }
}

#[derive(Debug, Deserialize)]
struct FeedbackResponse {
    feedback_data: WireFeedback,
}

#[derive(Debug, Deserialize)]
struct WireFeedback {
    score: u16,
    categorized_feedback: WireCategorized,
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WireCategorized {
    grammar: String,
    vocabulary: String,
    nuance: String,
}

impl WireFeedback {
    fn into_record(self) -> Result<FeedbackRecord, GraderError> {
        let score = u8::try_from(self.score)
            .ok()
            .and_then(|value| Score::new(value).ok())
            .ok_or(GraderError::InvalidScore(self.score))?;

        Ok(FeedbackRecord::new(
            score,
            CategorizedFeedback {
                grammar: self.categorized_feedback.grammar,
                vocabulary: self.categorized_feedback.vocabulary,
                nuance: self.categorized_feedback.nuance,
            },
            self.suggestions,
        ))
    }
}
