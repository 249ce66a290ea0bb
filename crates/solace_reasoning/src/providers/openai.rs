use crate::api_types::{ContentBlock, Message, MessagesResponse, Role};
use crate::llm::{CompletionParams, LlmClient};
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Any OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(model: &str, base_url: Option<&str>) -> Result<Self> {
        let api_key = super::api_key("OPENAI_API_KEY")?;
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

fn build_payload(model: &str, system: &str, messages: &[Message], params: &CompletionParams) -> Value {
    // The system prompt goes first with role "system".
    let mut openai_messages = vec![json!({"role": "system", "content": system})];
    for msg in messages {
        let role = match msg.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        openai_messages.push(json!({"role": role, "content": msg.plain_text()}));
    }
    json!({
        "model": model,
        "messages": openai_messages,
        "temperature": params.temperature,
        "max_tokens": params.max_tokens,
    })
}

fn parse_choice(resp_json: &Value) -> MessagesResponse {
    let choice = &resp_json["choices"][0];
    let content = choice["message"]["content"]
        .as_str()
        .filter(|s| !s.is_empty())
        .map(|s| vec![ContentBlock::Text { text: s.to_string() }])
        .unwrap_or_default();
    MessagesResponse {
        content,
        stop_reason: choice["finish_reason"].as_str().map(|s| s.to_string()),
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    #[tracing::instrument(skip(self, system, messages, params), fields(model = %self.model))]
    async fn complete(
        &self,
        system: &str,
        messages: Vec<Message>,
        params: CompletionParams,
    ) -> Result<MessagesResponse> {
        let payload = build_payload(&self.model, system, &messages, &params);
        let url = format!("{}/chat/completions", self.base_url);

        let retry_config = crate::retry::RetryConfig::default();
        let client = &self.client;
        let api_key = &self.api_key;

        let response = crate::retry::with_retry(&retry_config, "OpenAI", || async {
            let resp = client
                .post(&url)
                .header("Authorization", format!("Bearer {}", api_key))
                .json(&payload)
                .send()
                .await
                .context("Failed to send request to OpenAI")?;
            Ok(resp)
        })
        .await?;

        let resp_json: Value = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;
        Ok(parse_choice(&resp_json))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_puts_system_first() {
        let messages = vec![
            Message::text(Role::User, "hi"),
            Message::text(Role::Assistant, "Hey there."),
        ];
        let payload = build_payload("gpt-4o-mini", "brief", &messages, &CompletionParams::default());
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][0]["content"], "brief");
        assert_eq!(payload["messages"][2]["role"], "assistant");
        assert_eq!(payload["max_tokens"], 1024);
    }

    #[test]
    fn test_parse_choice() {
        let resp = json!({
            "choices": [{"message": {"role": "assistant", "content": "I'm listening."}, "finish_reason": "stop"}]
        });
        let parsed = parse_choice(&resp);
        assert_eq!(parsed.text(), "I'm listening.");
        assert_eq!(parsed.stop_reason.as_deref(), Some("stop"));

        let empty = parse_choice(&json!({"choices": []}));
        assert!(empty.content.is_empty());
    }
}
