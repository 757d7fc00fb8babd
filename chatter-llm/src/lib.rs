//! Generative-text integration for Chatter.
//!
//! This crate exposes the [`traits::LlmClient`] interface used by the
//! summarizer and the Google Gemini implementation behind it. Use
//! [`build_llm_client`] to construct a client from the loaded configuration.
//!
//! # Examples
//! ```no_run
//! use chatter_config::{HttpConfig, LlmConfig};
//! use chatter_llm::build_llm_client;
//!
//! let cfg = LlmConfig::Gemini {
//!     api_key: "key".into(),
//!     model: chatter_llm::DEFAULT_GEMINI_MODEL.into(),
//!     temperature: None,
//!     max_tokens: None,
//! };
//! let client = build_llm_client(&cfg, &HttpConfig::default()).unwrap();
//! assert_eq!(client.model_name(), "gemini-1.5-flash");
//! ```
pub mod gemini;
pub mod traits;

use chatter_common::ChatterError;
use chatter_config::{HttpConfig, LlmConfig};
use gemini::GeminiClient;
use std::sync::Arc;
use std::time::Duration;
use traits::LlmClient;

pub use traits::{LlmError, LlmResponse};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Build the configured LLM client with explicit connect/request timeouts.
pub fn build_llm_client(
    config: &LlmConfig,
    http: &HttpConfig,
) -> chatter_common::Result<Arc<dyn LlmClient + Send + Sync + 'static>> {
    match config {
        LlmConfig::Gemini {
            api_key,
            model,
            temperature,
            max_tokens,
        } => {
            if api_key.trim().is_empty() {
                return Err(ChatterError::Config("llm.api_key is empty".to_string()));
            }
            let client = GeminiClient::new(
                api_key.clone(),
                model.clone(),
                Duration::from_secs(http.connect_timeout_secs),
                Duration::from_secs(http.llm_timeout_secs),
            )
            .map_err(|e| ChatterError::Config(e.to_string()))?
            .with_defaults(*max_tokens, *temperature);
            Ok(Arc::new(client))
        }
    }
}
