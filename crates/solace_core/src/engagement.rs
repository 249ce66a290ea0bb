//! Engagement heuristics over recent user turns.
//!
//! Everything here is a cheap regex or substring check. The signals feed the
//! media gate and the reply selector; none of them look at agent turns except
//! the context-ask and helpline checks at the bottom.

use crate::{normalize, Conversation};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// User turns inspected for filler replies.
pub const DRY_REPLY_WINDOW: usize = 5;
/// User turns inspected for emotional vocabulary.
pub const EMOTIONAL_HISTORY_WINDOW: usize = 6;
/// Agent turns inspected for an earlier helpline reference.
pub const CRISIS_REPEAT_WINDOW: usize = 2;

/// Trimmed messages shorter than this count as dry.
const MIN_CONTENT_CHARS: usize = 4;

const EMOTIONAL_VOCABULARY: &[&str] = &[
    "sad", "tired", "empty", "alone", "lonely", "anxious", "anxiety", "stress", "overwhelmed",
    "drained", "can't", "cant", "don't feel", "dont feel", "hurt", "pain", "break", "breaking",
    "heavy", "numb", "lost", "hopeless", "depressed", "depression", "worried", "worry", "scared",
    "fear", "panic",
];

// ============================================================================
// Patterns
// ============================================================================

static DRY_REPLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(hmm+|hm|ok|k|fine|idk|ntg|nothing|nah|nope|not really|nm|not much|\.\.\.|\.\.|yeah|yea|uh)$")
        .unwrap()
});

static QUESTION_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(why|how|what|when|where|can you|could you|do you)\b").unwrap()
});

static GREETING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(hi|hello|hey)$").unwrap());

static DIRECT_MOOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(i'm|im|i am|feeling|feel)\s+(anxious|depressed|sad|stressed|lonely|empty|numb|tired|overwhelmed|burnt out|burnout|angry|frustrated|hopeless|lost|alone)\b",
    )
    .unwrap()
});

static LONE_MOOD_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(anxious|depressed|sad|stressed|lonely|empty|numb|tired|overwhelmed|angry|frustrated|hopeless|lost|alone)$",
    )
    .unwrap()
});

static AFFIRMATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(good|great|i'm good|im good|doing good|doing well)$").unwrap()
});

static ECHO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(mind\??|my mind\??|what\??|huh\??|me\??)$").unwrap()
});

static REAL_QUESTION_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(why|how|what's|whats|when|where|can you|could you|do you|does|is it|are you|who are)\b",
    )
    .unwrap()
});

static CAPABILITY_QUESTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)what can (you|u) do").unwrap());

static HOW_ARE_YOU: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)how are (you|u)").unwrap());

static LISTENING_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(listen to me|hear me out|let me tell you|i need to talk|i want to tell you)\b")
        .unwrap()
});

static HEARTBREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(heartbroken|broke up|dumped|breakup|break up|left me|ended it|relationship ended|bf|gf|boyfriend|girlfriend|ex)\b",
    )
    .unwrap()
});

/// An agent turn that already asked the user to explain.
static CONTEXT_ASK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)what happened|what's been|tell me more|what's going on").unwrap()
});

/// Wider cue list for "the user is now explaining".
static CONTEXT_CUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)what happened|what's been|tell me more|what's going on|can you tell me|i'm listening|tell me|go ahead",
    )
    .unwrap()
});

static HELPLINE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)988|crisis lifeline|741741").unwrap());

// ============================================================================
// Single-message detectors
// ============================================================================

pub fn is_dry_reply(text: &str) -> bool {
    let trimmed = text.trim();
    DRY_REPLY.is_match(trimmed) || trimmed.chars().count() < MIN_CONTENT_CHARS
}

pub fn has_emotional_vocabulary(text: &str) -> bool {
    let text = normalize(text);
    EMOTIONAL_VOCABULARY.iter().any(|kw| text.contains(kw))
}

pub fn is_question(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.ends_with('?') || QUESTION_OPENER.is_match(trimmed)
}

pub fn is_greeting(text: &str) -> bool {
    GREETING.is_match(text.trim())
}

/// "I'm anxious", "feeling lost", or just "lonely".
pub fn is_direct_mood_statement(text: &str) -> bool {
    let text = normalize(text);
    DIRECT_MOOD.is_match(&text) || LONE_MOOD_WORD.is_match(text.trim())
}

pub fn is_affirmation(text: &str) -> bool {
    AFFIRMATION.is_match(normalize(text).trim())
}

/// Low-content echo of the agent's own words ("what?", "my mind?").
pub fn is_echo(text: &str) -> bool {
    ECHO.is_match(text.trim())
}

/// Stricter than [`is_question`]: a bare "?" or "what?" does not count.
pub fn is_real_question(text: &str) -> bool {
    let text = normalize(text);
    let trimmed = text.trim();
    (trimmed.ends_with('?') && trimmed.chars().count() > 5) || REAL_QUESTION_OPENER.is_match(trimmed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqTopic {
    Capabilities,
    HowAreYou,
}

pub fn faq_topic(text: &str) -> Option<FaqTopic> {
    if CAPABILITY_QUESTION.is_match(text) {
        Some(FaqTopic::Capabilities)
    } else if HOW_ARE_YOU.is_match(text) {
        Some(FaqTopic::HowAreYou)
    } else {
        None
    }
}

pub fn is_listening_request(text: &str) -> bool {
    LISTENING_REQUEST.is_match(&normalize(text))
}

pub fn is_heartbreak(text: &str) -> bool {
    HEARTBREAK.is_match(&normalize(text))
}

// ============================================================================
// Conversation-level signals
// ============================================================================

/// Position on the dry-reply recovery ladder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DryReplyTier {
    #[default]
    None,
    SoftAcknowledge,
    LightProbe,
    GentleVariety,
    RespectSilence,
}

impl DryReplyTier {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => DryReplyTier::None,
            1 => DryReplyTier::SoftAcknowledge,
            2 => DryReplyTier::LightProbe,
            3 => DryReplyTier::GentleVariety,
            _ => DryReplyTier::RespectSilence,
        }
    }

    /// 0 for none, 1 through 4 otherwise.
    pub fn step(&self) -> usize {
        *self as usize
    }
}

/// Filler replies among the last [`DRY_REPLY_WINDOW`] user turns.
pub fn dry_reply_count(conversation: &Conversation) -> usize {
    conversation
        .recent_user_turns(DRY_REPLY_WINDOW)
        .filter(|t| is_dry_reply(&t.text))
        .count()
}

/// Any emotional vocabulary among the last [`EMOTIONAL_HISTORY_WINDOW`] user turns.
pub fn has_emotional_history(conversation: &Conversation) -> bool {
    conversation
        .recent_user_turns(EMOTIONAL_HISTORY_WINDOW)
        .any(|t| has_emotional_vocabulary(&t.text))
}

/// Whether any agent turn before the latest user turn asked for context.
pub fn context_requested_earlier(conversation: &Conversation) -> bool {
    let turns = conversation.turns();
    let end = turns.iter().rposition(|t| t.is_user()).unwrap_or(turns.len());
    turns[..end]
        .iter()
        .any(|t| !t.is_user() && CONTEXT_ASK.is_match(&normalize(&t.text)))
}

/// Whether the most recent agent turn invited the user to explain.
pub fn last_agent_invited_context(conversation: &Conversation) -> bool {
    conversation
        .last_agent_turn()
        .is_some_and(|t| CONTEXT_CUE.is_match(&normalize(&t.text)))
}

/// Whether one of the last [`CRISIS_REPEAT_WINDOW`] agent turns already gave helplines.
pub fn helplines_recently_given(conversation: &Conversation) -> bool {
    conversation
        .recent_agent_turns(CRISIS_REPEAT_WINDOW)
        .any(|t| HELPLINE_REFERENCE.is_match(&t.text))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngagementSignals {
    pub user_turns: usize,
    pub dry_count: usize,
    pub dry_tier: DryReplyTier,
    pub emotional_history: bool,
    pub question: bool,
    pub greeting: bool,
}

impl EngagementSignals {
    pub fn from_conversation(conversation: &Conversation) -> Self {
        let latest = conversation.latest_user_text();
        let dry_count = dry_reply_count(conversation);
        Self {
            user_turns: conversation.user_turn_count(),
            dry_count,
            dry_tier: DryReplyTier::from_count(dry_count),
            emotional_history: has_emotional_history(conversation),
            question: is_question(&latest),
            greeting: is_greeting(&latest),
        }
    }
}
