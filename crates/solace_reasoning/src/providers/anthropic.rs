use crate::api_types::{Message, MessagesRequest, MessagesResponse, Role};
use crate::llm::{CompletionParams, LlmClient};
use anyhow::{Context, Result};
use reqwest::Client;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    pub fn new(model: &str, base_url: Option<&str>) -> Result<Self> {
        let api_key = super::api_key("ANTHROPIC_API_KEY")?;
        Ok(Self {
            client: Client::builder().timeout(super::HTTP_TIMEOUT).build()?,
            api_key,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: model.to_string(),
        })
    }
}

/// The Messages API requires the first message to come from the user.
fn leading_user(messages: Vec<Message>) -> Vec<Message> {
    messages
        .into_iter()
        .skip_while(|m| m.role == Role::Assistant)
        .collect()
}

#[async_trait::async_trait]
impl LlmClient for AnthropicClient {
    #[tracing::instrument(skip(self, system, messages, params), fields(model = %self.model))]
    async fn complete(
        &self,
        system: &str,
        messages: Vec<Message>,
        params: CompletionParams,
    ) -> Result<MessagesResponse> {
        let url = format!("{}/v1/messages", self.base_url);

        let request_body = MessagesRequest {
            model: self.model.clone(),
            system: (!system.is_empty()).then(|| system.to_string()),
            messages: leading_user(messages),
            max_tokens: params.max_tokens,
            temperature: Some(params.temperature),
        };

        tracing::debug!(
            "LLM params: max_tokens={}, temperature={:.2}",
            params.max_tokens,
            params.temperature
        );

        let retry_config = crate::retry::RetryConfig::default();
        let client = &self.client;
        let api_key = &self.api_key;

        let response = crate::retry::with_retry(&retry_config, "Anthropic", || async {
            let resp = client
                .post(&url)
                .header("x-api-key", api_key)
                .header("anthropic-version", API_VERSION)
                .json(&request_body)
                .send()
                .await
                .context("Failed to send request to Anthropic")?;
            Ok(resp)
        })
        .await?;

        let resp_text = response.text().await?;
        tracing::debug!(
            "Anthropic raw response (first 500 chars): {}",
            resp_text.chars().take(500).collect::<String>()
        );
        let api_response: MessagesResponse =
            serde_json::from_str(&resp_text).context("Failed to parse Anthropic response")?;
        Ok(api_response)
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_assistant_turns_dropped() {
        let messages = vec![
            Message::text(Role::Assistant, "Hi, I'm here."),
            Message::text(Role::User, "hey"),
            Message::text(Role::Assistant, "Hey there."),
        ];
        let trimmed = leading_user(messages);
        assert_eq!(trimmed.len(), 2);
        assert_eq!(trimmed[0].role, Role::User);
    }
}
