use serde::{Deserialize, Serialize};
use solace_core::Turn;

/// Body of `POST /chat`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Full history, oldest first. The caller owns it and resends it each turn.
    #[serde(default)]
    pub messages: Option<Vec<Turn>>,
}

impl ChatRequest {
    /// The turns, or `None` when the list is missing or empty.
    pub fn into_turns(self) -> Option<Vec<Turn>> {
        self.messages.filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_from_web_client_json() {
        let json = r#"{"messages":[
            {"id":"5f0c6f7e-0c55-4d0b-9a3f-3a8f4b2f1e10","role":"bot","content":"Hi, I'm here.","timestamp":1700000000000},
            {"role":"user","content":"hey"}
        ]}"#;
        let req: ChatRequest = serde_json::from_str(json).unwrap();
        let turns = req.into_turns().unwrap();
        assert_eq!(turns.len(), 2);
        assert!(turns[1].is_user());
    }

    #[test]
    fn test_missing_or_empty_messages() {
        let req: ChatRequest = serde_json::from_str("{}").unwrap();
        assert!(req.into_turns().is_none());
        let req: ChatRequest = serde_json::from_str(r#"{"messages":[]}"#).unwrap();
        assert!(req.into_turns().is_none());
    }
}
