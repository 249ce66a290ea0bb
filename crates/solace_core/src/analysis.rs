//! One-pass analysis of a conversation.
//!
//! Bundles every deterministic signal the reply layer needs so each component
//! runs exactly once per turn.

use crate::catalogue::Catalogue;
use crate::engagement::EngagementSignals;
use crate::media::{self, MediaDecision};
use crate::mood::{self, MoodSummary};
use crate::ranker::{self, CategoryMatch};
use crate::safety::{CrisisClassifier, CrisisScope, CrisisVerdict};
use crate::Conversation;

/// Crisis verdicts for the latest user turn at each scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrisisAssessment {
    pub mood: CrisisVerdict,
    pub media: CrisisVerdict,
    pub reply: CrisisVerdict,
}

impl CrisisAssessment {
    pub fn of(text: &str) -> Self {
        Self {
            mood: CrisisClassifier::new(CrisisScope::Mood).assess(text),
            media: CrisisClassifier::new(CrisisScope::Media).assess(text),
            reply: CrisisClassifier::new(CrisisScope::Reply).assess(text),
        }
    }

    pub fn at(&self, scope: CrisisScope) -> &CrisisVerdict {
        match scope {
            CrisisScope::Mood => &self.mood,
            CrisisScope::Media => &self.media,
            CrisisScope::Reply => &self.reply,
        }
    }

    /// Verdict the media gate sees. Widens to `Reply` whenever that scope
    /// would send the crisis script.
    pub fn gate(&self) -> &CrisisVerdict {
        if self.reply.at_risk {
            &self.reply
        } else {
            &self.media
        }
    }
}

#[derive(Debug, Clone)]
pub struct TurnAnalysis<'a> {
    pub matches: Vec<CategoryMatch<'a>>,
    pub mood: MoodSummary,
    pub crisis: CrisisAssessment,
    pub signals: EngagementSignals,
    pub media: MediaDecision,
}

pub fn analyze<'a>(catalogue: &'a Catalogue, conversation: &Conversation) -> TurnAnalysis<'a> {
    let matches = ranker::rank(catalogue, conversation);
    let crisis = CrisisAssessment::of(&conversation.latest_user_text());
    let mood = mood::synthesize(&matches, &crisis.mood);
    let signals = EngagementSignals::from_conversation(conversation);
    let media = media::decide(&matches, &mood, crisis.gate(), &signals);

    tracing::debug!(
        dominant = %mood.dominant,
        confidence = mood.confidence,
        crisis = %crisis.reply,
        dry_count = signals.dry_count,
        media = ?media.reason,
        "Turn analysed"
    );

    TurnAnalysis {
        matches,
        mood,
        crisis,
        signals,
        media,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Category;
    use crate::media::MediaReason;
    use crate::safety::CrisisTier;
    use crate::Turn;

    #[test]
    fn test_first_anxious_turn() {
        let catalogue = Catalogue::builtin();
        let conv = Conversation::new(vec![Turn::user("I'm anxious")]).unwrap();
        let analysis = analyze(&catalogue, &conv);
        assert_eq!(analysis.mood.dominant, Category::Anxiety);
        assert!(!analysis.crisis.reply.at_risk);
        assert_eq!(analysis.media.reason, MediaReason::TooEarly);
    }

    #[test]
    fn test_crisis_turn_blocks_media() {
        let catalogue = Catalogue::builtin();
        let conv = Conversation::new(vec![
            Turn::user("work has been so stressful"),
            Turn::agent("That sounds heavy."),
            Turn::user("I want to jump off the roof"),
        ])
        .unwrap();
        let analysis = analyze(&catalogue, &conv);
        assert!(analysis.crisis.mood.at_risk);
        assert_eq!(analysis.crisis.reply.tier, CrisisTier::High);
        assert_eq!(analysis.media.reason, MediaReason::CrisisRisk);
        assert!(analysis.media.items.is_empty());
    }

    #[test]
    fn test_reply_only_risk_withholds_media() {
        let catalogue = Catalogue::builtin();
        for latest in ["i feel so lost", "honestly i feel helpless"] {
            let conv = Conversation::new(vec![
                Turn::user("i've been so sad and anxious"),
                Turn::agent("I'm here."),
                Turn::user("work stress too"),
                Turn::agent("That's a lot at once."),
                Turn::user(latest),
            ])
            .unwrap();
            let analysis = analyze(&catalogue, &conv);
            assert!(analysis.crisis.reply.at_risk, "{latest:?}");
            assert_eq!(analysis.crisis.gate(), &analysis.crisis.reply);
            assert_eq!(analysis.media.reason, MediaReason::CrisisRisk);
            assert!(analysis.media.items.is_empty());
        }
    }

    #[test]
    fn test_scopes_only_widen() {
        let a = CrisisAssessment::of("everyone is better off without me");
        assert!(!a.at(CrisisScope::Mood).at_risk);
        assert!(a.at(CrisisScope::Media).at_risk);
        assert!(a.at(CrisisScope::Reply).at_risk);
    }

    #[test]
    fn test_stale_crisis_language_does_not_linger() {
        let catalogue = Catalogue::builtin();
        let conv = Conversation::new(vec![
            Turn::user("i wanted to die last month"),
            Turn::agent("I'm glad you told me."),
            Turn::user("today was a better day"),
        ])
        .unwrap();
        let analysis = analyze(&catalogue, &conv);
        assert_eq!(analysis.crisis.reply, CrisisVerdict::none());
        assert_ne!(analysis.mood.dominant, Category::Suicide);
    }
}
