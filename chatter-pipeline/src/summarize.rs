use std::sync::Arc;
use std::time::Duration;

use chatter_common::Summary;
use chatter_llm::LlmError;
use chatter_llm::traits::LlmClient;

use crate::aggregate::AggregatedText;

pub const SUMMARY_INSTRUCTION: &str = "Summarize the following Reddit and Twitter content using bullet points. Highlight trending topics, common opinions, and anything noteworthy in a professional yet creative tone:";

/// Returned instead of a model call when nothing was aggregated.
pub const NO_CONTENT_SUMMARY: &str = "No content found for the given input.";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SummarizationError {
    #[error("summarization failed: {0}")]
    Service(LlmError),

    #[error("summarization still rate limited after retry: {0}")]
    RetryFailed(LlmError),
}

impl SummarizationError {
    pub fn source_error(&self) -> &LlmError {
        match self {
            SummarizationError::Service(e) | SummarizationError::RetryFailed(e) => e,
        }
    }
}

pub struct Summarizer {
    llm: Arc<dyn LlmClient + Send + Sync>,
    rate_limit_wait: Duration,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LlmClient + Send + Sync>, rate_limit_wait: Duration) -> Self {
        Self {
            llm,
            rate_limit_wait,
        }
    }

    pub fn build_prompt(blob: &AggregatedText) -> String {
        format!("{SUMMARY_INSTRUCTION}\n{}", blob.as_str())
    }

    /// Summarize `blob`, waiting once and retrying once on a rate limit.
    pub async fn summarize(&self, blob: &AggregatedText) -> Result<Summary, SummarizationError> {
        if blob.is_empty() {
            return Ok(Summary::new(NO_CONTENT_SUMMARY));
        }

        let prompt = Self::build_prompt(blob);
        match self.llm.generate(&prompt, None, None, None).await {
            Ok(resp) => Ok(Summary::new(resp.text)),
            Err(err) if err.is_rate_limit() => {
                tracing::warn!(
                    target: "pipeline",
                    wait_secs = self.rate_limit_wait.as_secs(),
                    error = %err,
                    "pipeline.summarize.rate_limited"
                );
                tokio::time::sleep(self.rate_limit_wait).await;
                self.llm
                    .generate(&prompt, None, None, None)
                    .await
                    .map(|resp| Summary::new(resp.text))
                    .map_err(SummarizationError::RetryFailed)
            }
            Err(err) => Err(SummarizationError::Service(err)),
        }
    }
}
