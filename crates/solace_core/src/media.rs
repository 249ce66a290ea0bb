//! Decides whether a turn may carry supplementary media.
//!
//! The checks run in a fixed order and the first one that applies wins. Every
//! outcome names its reason so a `debug!` line can explain an empty list.

use crate::catalogue::Category;
use crate::engagement::EngagementSignals;
use crate::mood::MoodSummary;
use crate::ranker::CategoryMatch;
use crate::safety::{CrisisTier, CrisisVerdict};
use crate::MediaItem;
use serde::Serialize;

/// Dominant confidence above which a non-general mood earns media on its own.
pub const MOOD_CONFIDENCE_THRESHOLD: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaReason {
    TooEarly,
    Greeting,
    CrisisRisk,
    SuicideMood,
    NoEmotionalSignal,
    Question,
    NoMediaForMatches,
    Offered,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaDecision {
    pub reason: MediaReason,
    pub items: Vec<MediaItem>,
}

impl MediaDecision {
    fn withheld(reason: MediaReason) -> Self {
        Self {
            reason,
            items: Vec::new(),
        }
    }

    pub fn is_offered(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Run the gate.
///
/// `verdict` is the `Media`-scope verdict, or the `Reply`-scope one when that
/// scope puts the turn at risk. A turn that gets the crisis script never
/// carries media.
pub fn decide(
    matches: &[CategoryMatch<'_>],
    mood: &MoodSummary,
    verdict: &CrisisVerdict,
    signals: &EngagementSignals,
) -> MediaDecision {
    if signals.user_turns < 2 {
        return MediaDecision::withheld(MediaReason::TooEarly);
    }
    if signals.greeting && signals.user_turns < 3 {
        return MediaDecision::withheld(MediaReason::Greeting);
    }
    // Medium counts too: no videos next to hopelessness.
    if verdict.at_risk || verdict.tier != CrisisTier::None {
        return MediaDecision::withheld(MediaReason::CrisisRisk);
    }
    if mood.dominant == Category::Suicide {
        return MediaDecision::withheld(MediaReason::SuicideMood);
    }

    let struggling_to_say = signals.dry_count >= 2 && signals.user_turns >= 3;
    let clear_mood =
        mood.dominant != Category::General && mood.confidence > MOOD_CONFIDENCE_THRESHOLD;
    if !(signals.emotional_history || struggling_to_say || clear_mood) {
        return MediaDecision::withheld(MediaReason::NoEmotionalSignal);
    }
    if signals.question {
        return MediaDecision::withheld(MediaReason::Question);
    }

    // Suicide keywords left in the history must not pull suicide videos back
    // into a calm turn.
    let offer = matches
        .iter()
        .filter(|m| m.name() != Category::Suicide)
        .find(|m| !m.category.media.is_empty());
    match offer {
        Some(m) => MediaDecision {
            reason: MediaReason::Offered,
            items: m.category.media.clone(),
        },
        None => MediaDecision::withheld(MediaReason::NoMediaForMatches),
    }
}
