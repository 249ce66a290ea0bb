//! Generative backends behind [`LlmClient`](crate::llm::LlmClient).

pub mod anthropic;
pub mod gemini;
pub mod mock;
pub mod openai;

use crate::llm::LlmClient;
use anyhow::Result;
use solace_core::config::LlmConfig;
use solace_core::EngineError;
use std::sync::Arc;
use std::time::Duration;

/// HTTP timeout for a single request. The engine applies its own, shorter
/// deadline around the whole call including retries.
pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Read a provider key, treating an empty value as missing.
pub(crate) fn api_key(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(EngineError::MisconfiguredBackend(format!("{} is not set", var)).into()),
    }
}

/// Build the client named by `config.provider`.
///
/// `none` yields `Ok(None)`. A missing key or unknown provider is a
/// [`EngineError::MisconfiguredBackend`].
pub fn create_client(config: &LlmConfig) -> Result<Option<Arc<dyn LlmClient>>> {
    let base_url = config.base_url.as_deref();
    let client: Arc<dyn LlmClient> = match config.provider.to_lowercase().as_str() {
        "none" | "" => return Ok(None),
        "mock" => Arc::new(mock::MockProvider::new(&config.model)),
        "gemini" | "google" => Arc::new(gemini::GeminiClient::new(&config.model, base_url)?),
        "anthropic" | "claude" => {
            Arc::new(anthropic::AnthropicClient::new(&config.model, base_url)?)
        }
        "openai" => Arc::new(openai::OpenAiClient::new(&config.model, base_url)?),
        other => {
            return Err(
                EngineError::MisconfiguredBackend(format!("unknown provider '{}'", other)).into(),
            )
        }
    };
    tracing::info!("Using {} backend with model {}", client.name(), config.model);
    Ok(Some(client))
}
