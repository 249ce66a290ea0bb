//! Local reply policy.
//!
//! A stateless function of the conversation and its analysis: replaying the
//! same history with the same seed gives the same reply. The branches below
//! are checked in priority order and the first one that applies wins.

use crate::pools::{self, pick, Pool, FALLBACK_REPLY};
use rand::Rng;
use serde::Serialize;
use solace_core::analysis::TurnAnalysis;
use solace_core::engagement::{self, DryReplyTier, FaqTopic};
use solace_core::safety::CrisisTier;
use solace_core::Conversation;

/// Turns below which a weak mood reading is treated as medium confidence.
const EARLY_TURNS: usize = 3;
/// Confidence floor applied to early turns.
const EARLY_CONFIDENCE_FLOOR: f32 = 0.5;
const MEDIUM_CONFIDENCE: f32 = 0.5;
const HIGH_CONFIDENCE: f32 = 0.7;
/// Minimum length of a reply that counts as the user explaining themselves.
const MIN_EXPLANATION_CHARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    VagueExtraction,
    Natural,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "family", content = "tier")]
pub enum Strategy {
    Crisis,
    CrisisReinforcement,
    MediumSupport,
    ContextQuestion,
    Greeting,
    Affirmation,
    Clarify,
    Answer,
    DryReply(DryReplyTier),
    Listening,
    Analysis,
    Heartbreak,
    Confidence(ConfidenceTier),
}

impl Strategy {
    pub fn is_crisis(&self) -> bool {
        matches!(self, Strategy::Crisis | Strategy::CrisisReinforcement)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub strategy: Strategy,
    pub text: String,
}

impl Reply {
    fn fixed(strategy: Strategy, text: &str) -> Self {
        Self {
            strategy,
            text: text.to_string(),
        }
    }

    fn from_pool<R: Rng + ?Sized>(strategy: Strategy, pool: Pool, rng: &mut R) -> Self {
        Self::fixed(strategy, pick(pool, rng, FALLBACK_REPLY))
    }
}

/// Choose the local reply for the latest user turn.
pub fn select<R: Rng + ?Sized>(
    conversation: &Conversation,
    analysis: &TurnAnalysis<'_>,
    rng: &mut R,
) -> Reply {
    let latest = conversation.latest_user_text();
    let trimmed = latest.trim();
    let signals = &analysis.signals;
    let category = analysis.mood.dominant;
    let verdict = &analysis.crisis.reply;

    if verdict.at_risk {
        if engagement::helplines_recently_given(conversation) {
            return Reply::from_pool(Strategy::CrisisReinforcement, pools::CRISIS_REINFORCEMENT, rng);
        }
        return Reply::fixed(Strategy::Crisis, pools::CRISIS_SCRIPT);
    }
    if verdict.tier == CrisisTier::Medium {
        return Reply::fixed(Strategy::MediumSupport, pools::MEDIUM_SUPPORT);
    }

    if engagement::is_direct_mood_statement(trimmed)
        && !engagement::context_requested_earlier(conversation)
    {
        return Reply::from_pool(Strategy::ContextQuestion, pools::CONTEXT_QUESTIONS, rng);
    }
    if signals.greeting {
        return Reply::fixed(Strategy::Greeting, pools::GREETING_REPLY);
    }
    if engagement::is_affirmation(trimmed) {
        return Reply::fixed(Strategy::Affirmation, pools::AFFIRMATION_REPLY);
    }
    if engagement::is_echo(trimmed) {
        return Reply::from_pool(Strategy::Clarify, pools::CLARIFY, rng);
    }

    let real_question = engagement::is_real_question(trimmed);
    if real_question {
        return match engagement::faq_topic(trimmed) {
            Some(FaqTopic::Capabilities) => Reply::fixed(Strategy::Answer, pools::CAPABILITIES_REPLY),
            Some(FaqTopic::HowAreYou) => Reply::fixed(Strategy::Answer, pools::HOW_ARE_YOU_REPLY),
            None => Reply::from_pool(Strategy::Answer, pools::question_answers(category), rng),
        };
    }

    if signals.dry_tier != DryReplyTier::None && !signals.emotional_history {
        return Reply::from_pool(
            Strategy::DryReply(signals.dry_tier),
            pools::dry_reply(signals.dry_tier),
            rng,
        );
    }

    if engagement::is_listening_request(trimmed) {
        return Reply::from_pool(Strategy::Listening, pools::LISTENING, rng);
    }

    if engagement::last_agent_invited_context(conversation)
        && latest.chars().count() > MIN_EXPLANATION_CHARS
    {
        if engagement::is_heartbreak(trimmed) {
            return Reply::from_pool(Strategy::Heartbreak, pools::HEARTBREAK, rng);
        }
        return Reply::from_pool(Strategy::Analysis, pools::analysis(category), rng);
    }

    let tier = confidence_tier(
        analysis.mood.confidence,
        signals.user_turns,
        signals.emotional_history && signals.dry_count >= 1,
    );
    let pool = match tier {
        ConfidenceTier::VagueExtraction => pools::vague_extraction(category),
        ConfidenceTier::Natural => pools::natural(category),
        ConfidenceTier::Medium => pools::medium_confidence(category),
        ConfidenceTier::High => pools::high_confidence(category),
    };
    Reply::from_pool(Strategy::Confidence(tier), pool, rng)
}

/// Map mood confidence to a phrasing tier.
///
/// Early in a conversation a weak reading is lifted to medium so the first
/// replies stay conversational.
pub fn confidence_tier(confidence: f32, user_turns: usize, allow_extraction: bool) -> ConfidenceTier {
    let confidence = if user_turns < EARLY_TURNS && confidence < EARLY_CONFIDENCE_FLOOR {
        EARLY_CONFIDENCE_FLOOR
    } else {
        confidence
    };
    if confidence < MEDIUM_CONFIDENCE {
        if allow_extraction {
            ConfidenceTier::VagueExtraction
        } else {
            ConfidenceTier::Natural
        }
    } else if confidence < HIGH_CONFIDENCE {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::High
    }
}
