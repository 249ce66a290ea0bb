//! Property-based tests for the local reply policy and the policy brief.
//!
//! Whatever the history, an explicit crisis phrase in the latest turn must
//! produce helpline numbers, and selection must be total and replayable.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use solace_core::{analyze, Catalogue, Conversation, Turn};
use solace_reasoning::prompts::compose_brief;
use solace_reasoning::strategy::select;

const FILLER: &[&str] = &[
    "ok", "hmm", "idk", "fine", "hey", "why does this happen", "i'm anxious",
    "work is a lot", "my girlfriend left", "what can you do?", "tell me more",
    "I'm stressed about exams", "nothing", "can i vent", "so tired lately",
];

const CRISIS_PHRASES: &[&str] = &[
    "i want to die",
    "i want to kill myself",
    "i'm going to jump off the bridge",
    "thinking about suicide",
];

fn arb_history() -> impl Strategy<Value = Vec<(bool, String)>> {
    prop::collection::vec(
        (any::<bool>(), prop::sample::select(FILLER).prop_map(String::from)),
        0..8,
    )
}

fn build(history: Vec<(bool, String)>, latest: &str) -> Conversation {
    let mut turns: Vec<Turn> = history
        .into_iter()
        .map(|(user, text)| if user { Turn::user(text) } else { Turn::agent(text) })
        .collect();
    turns.push(Turn::user(latest));
    Conversation::new(turns).unwrap()
}

// ============================================================================
// Selector Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// **Crisis first**: an explicit phrase in the latest turn always yields helplines.
    #[test]
    fn crisis_phrase_always_gets_helplines(
        history in arb_history(),
        phrase in prop::sample::select(CRISIS_PHRASES),
        seed in any::<u64>(),
    ) {
        let catalogue = Catalogue::builtin();
        let conversation = build(history, phrase);
        let analysis = analyze(&catalogue, &conversation);
        let reply = select(&conversation, &analysis, &mut StdRng::seed_from_u64(seed));
        prop_assert!(reply.strategy.is_crisis(), "got {:?}", reply.strategy);
        prop_assert!(reply.text.contains("988"));
        prop_assert!(analysis.media.items.is_empty());
    }

    /// **Total**: any latest text gets a non-empty reply.
    #[test]
    fn reply_never_empty(history in arb_history(), latest in "\\PC{0,200}", seed in any::<u64>()) {
        let catalogue = Catalogue::builtin();
        let conversation = build(history, &latest);
        let analysis = analyze(&catalogue, &conversation);
        let reply = select(&conversation, &analysis, &mut StdRng::seed_from_u64(seed));
        prop_assert!(!reply.text.trim().is_empty());
    }

    /// **Replayable**: same history and seed, same reply.
    #[test]
    fn same_seed_same_reply(
        history in arb_history(),
        latest in prop::sample::select(FILLER),
        seed in any::<u64>(),
    ) {
        let catalogue = Catalogue::builtin();
        let conversation = build(history, latest);
        let analysis = analyze(&catalogue, &conversation);
        let first = select(&conversation, &analysis, &mut StdRng::seed_from_u64(seed));
        let second = select(&conversation, &analysis, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// Brief Properties
// ============================================================================

proptest! {
    /// The brief always carries the crisis protocol and at most three guidance lines.
    #[test]
    fn brief_keeps_crisis_protocol(history in arb_history(), latest in "\\PC{0,200}") {
        let catalogue = Catalogue::builtin();
        let conversation = build(history, &latest);
        let analysis = analyze(&catalogue, &conversation);
        let brief = compose_brief("Solace", &analysis.matches, &analysis.mood);
        prop_assert!(brief.contains("988"));
        prop_assert!(brief.contains("741741"));
        let guidance = brief
            .split("== CONTEXT GUIDANCE ==")
            .nth(1)
            .unwrap_or_default()
            .lines()
            .filter(|l| l.starts_with("- "))
            .count();
        prop_assert!((1..=3).contains(&guidance));
    }
}
