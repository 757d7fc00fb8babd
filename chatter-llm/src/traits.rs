use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP 429 or a `RESOURCE_EXHAUSTED` status in the error payload.
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Content blocked: {0}")]
    Blocked(String),

    #[error("Empty response from model")]
    Empty,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimit(_))
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response to the given prompt with optional system prompt
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse, LlmError>;

    /// Get the model name being used
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rate_limit_is_retryable() {
        assert!(LlmError::RateLimit("quota".into()).is_rate_limit());
        assert!(!LlmError::Empty.is_rate_limit());
        assert!(!LlmError::Api {
            status: 500,
            message: "boom".into()
        }
        .is_rate_limit());
    }
}
