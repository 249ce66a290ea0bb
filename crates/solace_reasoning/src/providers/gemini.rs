use crate::api_types::{ContentBlock, Message, MessagesResponse, Role};
use crate::llm::{CompletionParams, LlmClient};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const TOP_K: u32 = 40;
const TOP_P: f32 = 0.95;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(model: &str, base_url: Option<&str>) -> Result<Self> {
        let api_key = super::api_key("GEMINI_API_KEY")?;
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

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

fn build_request(system: &str, messages: Vec<Message>, params: &CompletionParams) -> GenerateRequest {
    let system_instruction = (!system.is_empty()).then(|| Content {
        role: None,
        parts: vec![Part {
            text: Some(system.to_string()),
        }],
    });
    let contents = messages
        .into_iter()
        .map(|m| Content {
            role: Some(
                match m.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                }
                .to_string(),
            ),
            parts: vec![Part {
                text: Some(m.plain_text()),
            }],
        })
        .collect();
    GenerateRequest {
        system_instruction,
        contents,
        generation_config: GenerationConfig {
            temperature: params.temperature,
            top_k: TOP_K,
            top_p: TOP_P,
            max_output_tokens: params.max_tokens,
        },
    }
}

fn into_messages_response(resp: GenerateResponse) -> MessagesResponse {
    let Some(candidate) = resp.candidates.into_iter().next() else {
        return MessagesResponse {
            content: vec![],
            stop_reason: None,
        };
    };
    let content = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .map(|text| ContentBlock::Text { text })
                .collect()
        })
        .unwrap_or_default();
    MessagesResponse {
        content,
        stop_reason: candidate.finish_reason,
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    #[tracing::instrument(skip(self, system, messages, params), fields(model = %self.model))]
    async fn complete(
        &self,
        system: &str,
        messages: Vec<Message>,
        params: CompletionParams,
    ) -> Result<MessagesResponse> {
        let request_body = build_request(system, messages, &params);
        tracing::debug!(
            "LLM params: max_tokens={}, temperature={:.2}",
            params.max_tokens,
            params.temperature
        );

        let retry_config = crate::retry::RetryConfig::default();
        let client = &self.client;
        let api_key = &self.api_key;
        let url = self.endpoint();

        let response = crate::retry::with_retry(&retry_config, "Gemini", || async {
            let resp = client
                .post(&url)
                .header("x-goog-api-key", api_key)
                .json(&request_body)
                .send()
                .await
                .context("Failed to send request to Gemini")?;
            Ok(resp)
        })
        .await?;

        let resp_text = response.text().await?;
        let parsed: GenerateResponse =
            serde_json::from_str(&resp_text).context("Failed to parse Gemini response")?;
        Ok(into_messages_response(parsed))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let messages = vec![
            Message::text(Role::Assistant, "Hey. How are you feeling?"),
            Message::text(Role::User, "tired"),
        ];
        let params = CompletionParams {
            max_tokens: 1024,
            temperature: 0.7,
        };
        let json = serde_json::to_value(build_request("be kind", messages, &params)).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be kind");
        assert_eq!(json["contents"][0]["role"], "model");
        assert_eq!(json["contents"][1]["role"], "user");
        assert_eq!(json["contents"][1]["parts"][0]["text"], "tired");
        assert_eq!(json["generationConfig"]["topK"], 40);
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[test]
    fn test_parse_response() {
        let json = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "I'm "}, {"text": "here."}]},
                "finishReason": "STOP"
            }]
        }"#;
        let resp = into_messages_response(serde_json::from_str(json).unwrap());
        assert_eq!(resp.text(), "I'm here.");
        assert_eq!(resp.stop_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_blocked_response_has_no_text() {
        let json = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let resp = into_messages_response(serde_json::from_str(json).unwrap());
        assert_eq!(resp.text(), "");
        let empty = into_messages_response(serde_json::from_str("{}").unwrap());
        assert!(empty.content.is_empty());
    }
}
