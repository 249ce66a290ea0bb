pub mod analysis;
pub mod catalogue;
pub mod config;
pub mod engagement;
pub mod error;
pub mod media;
pub mod mood;
pub mod ranker;
pub mod safety;

pub use analysis::{analyze, TurnAnalysis};
pub use catalogue::{Catalogue, Category, EmotionalCategory};
pub use error::EngineError;
pub use mood::MoodSummary;
pub use ranker::CategoryMatch;
pub use safety::{CrisisClassifier, CrisisLayer, CrisisScope, CrisisTier, CrisisVerdict};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    #[serde(alias = "bot", alias = "assistant", alias = "model")]
    Agent,
}

/// A playable resource offered next to a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Language or variant name shown to the user.
    #[serde(alias = "language")]
    pub label: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl MediaItem {
    pub fn new(label: &str, url: &str) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
            tags: Vec::new(),
        }
    }
}

/// One message in the conversation. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub role: Role,
    #[serde(alias = "content")]
    pub text: String,
    /// Unix timestamp in milliseconds.
    #[serde(default, alias = "timestamp")]
    pub created_at: i64,
    #[serde(default, alias = "videos", skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaItem>,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            created_at: chrono::Utc::now().timestamp_millis(),
            media: Vec::new(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, text)
    }

    pub fn with_media(mut self, media: Vec<MediaItem>) -> Self {
        self.media = media;
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// The full, caller-owned history for one analysis call.
///
/// Always holds at least one turn.
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new(turns: Vec<Turn>) -> Result<Self, EngineError> {
        if turns.is_empty() {
            return Err(EngineError::EmptyConversation);
        }
        Ok(Self { turns })
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }

    pub fn user_turns(&self) -> impl DoubleEndedIterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.role == Role::User)
    }

    pub fn agent_turns(&self) -> impl DoubleEndedIterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.role == Role::Agent)
    }

    pub fn user_turn_count(&self) -> usize {
        self.user_turns().count()
    }

    /// The last `n` user turns, oldest first.
    pub fn recent_user_turns(&self, n: usize) -> impl Iterator<Item = &Turn> {
        let skip = self.user_turn_count().saturating_sub(n);
        self.user_turns().skip(skip)
    }

    /// The last `n` agent turns, oldest first.
    pub fn recent_agent_turns(&self, n: usize) -> impl Iterator<Item = &Turn> {
        let skip = self.agent_turns().count().saturating_sub(n);
        self.agent_turns().skip(skip)
    }

    pub fn latest_user_turn(&self) -> Option<&Turn> {
        self.user_turns().next_back()
    }

    pub fn last_agent_turn(&self) -> Option<&Turn> {
        self.agent_turns().next_back()
    }

    /// Normalized text of the latest user turn, or empty when there is none.
    pub fn latest_user_text(&self) -> String {
        self.latest_user_turn()
            .map(|t| normalize(&t.text))
            .unwrap_or_default()
    }
}

/// Final answer for one turn. Nothing else leaves the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineResult {
    pub text: String,
    #[serde(default)]
    pub media: Vec<MediaItem>,
    pub mood: MoodSummary,
}

impl EngineResult {
    /// Generic answer used when the transport around the engine fails.
    pub fn reconnect() -> Self {
        Self {
            text: "I'm having trouble connecting. Let's pause and try again soon.".to_string(),
            media: Vec::new(),
            mood: MoodSummary::neutral(),
        }
    }
}

/// Lower-case and fold typographic apostrophes so "can’t" matches "can't".
pub fn normalize(text: &str) -> String {
    text.to_lowercase().replace(['\u{2018}', '\u{2019}'], "'")
}
