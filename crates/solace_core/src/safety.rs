//! Three-layer crisis classifier.
//!
//! Each layer is an ordered list of named rules; any rule firing marks the turn
//! as at risk. Rules carry the narrowest [`CrisisScope`] they belong to, and a
//! classification at a scope applies every rule at or below it, so a wider
//! scope can only ever add alarms. Only the latest user turn is inspected.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

// ============================================================================
// Verdict types
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisTier {
    #[default]
    None,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisLayer {
    /// Hopelessness, wanting to disappear, feeling trapped.
    EmotionalIntent,
    /// Catastrophizing and self-as-burden phrasing.
    LinguisticRisk,
    /// Explicit terms that fire even on one-word input.
    KeywordFailsafe,
}

/// Which consumer a classification is run for. Ordered narrowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CrisisScope {
    /// Mood derivation: core intent rules and the core failsafe only.
    Mood,
    /// Media gating: adds linguistic risk and self-harm methods.
    Media,
    /// Reply selection: adds bare hopelessness.
    Reply,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrisisVerdict {
    pub at_risk: bool,
    pub tier: CrisisTier,
    /// Diagnostics only.
    pub layer: Option<CrisisLayer>,
    /// Diagnostics only.
    pub rule: Option<&'static str>,
}

impl CrisisVerdict {
    pub fn none() -> Self {
        Self::default()
    }
}

impl fmt::Display for CrisisVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.layer, self.rule) {
            (Some(layer), Some(rule)) => write!(f, "{:?} ({:?}: {})", self.tier, layer, rule),
            (_, Some(rule)) => write!(f, "{:?} ({})", self.tier, rule),
            _ => write!(f, "{:?}", self.tier),
        }
    }
}

// ============================================================================
// Rules
// ============================================================================

pub struct CrisisRule {
    pub name: &'static str,
    pub layer: CrisisLayer,
    pub scope: CrisisScope,
    pattern: Regex,
}

impl CrisisRule {
    fn new(name: &'static str, layer: CrisisLayer, scope: CrisisScope, pattern: &str) -> Self {
        Self {
            name,
            layer,
            scope,
            pattern: Regex::new(&format!("(?i){}", pattern)).unwrap(),
        }
    }

    /// Test normalized text against this rule alone.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

use CrisisLayer::{EmotionalIntent, KeywordFailsafe, LinguisticRisk};
use CrisisScope::{Media, Mood, Reply};

static RULES: LazyLock<Vec<CrisisRule>> = LazyLock::new(|| {
    vec![
        // --- Layer 1: emotional intent ---
        CrisisRule::new("cant_take_anymore", EmotionalIntent, Mood,
            r"\b(can't take|cant take)\b.*\b(this|it|anymore|much more)\b"),
        CrisisRule::new("nothing_matters", EmotionalIntent, Mood,
            r"\b(nothing matters|no point|what's the point|whats the point)\b"),
        CrisisRule::new("want_to_disappear", EmotionalIntent, Mood,
            r"\b(want to|wish i could|need to)\b.*\b(disappear|vanish|not exist|be gone)\b"),
        CrisisRule::new("tired_of_living", EmotionalIntent, Mood,
            r"\b(tired of|sick of)\b.*\b(living|surviving|existing|being here)\b"),
        CrisisRule::new("make_it_stop", EmotionalIntent, Mood,
            r"\b(want everything to|make it all|make this)\b.*\b(stop|end|go away)\b"),
        CrisisRule::new("dont_belong", EmotionalIntent, Mood,
            r"\b(don't belong|dont belong|not meant to be)\b"),
        CrisisRule::new("no_future", EmotionalIntent, Mood,
            r"\b(no future|can't see|cant see)\b.*\b(future|tomorrow|way out)\b"),
        CrisisRule::new("falling_apart", EmotionalIntent, Mood,
            r"\b(breaking|falling apart|can't hold|cant hold)\b.*\b(on|together|up)\b"),
        CrisisRule::new("feel_unreal", EmotionalIntent, Mood,
            r"\b(empty inside|feel nothing|don't feel|dont feel)\b.*\b(real|alive)\b"),
        CrisisRule::new("trapped", EmotionalIntent, Mood,
            r"\b(trapped|stuck|no way out|can't escape|cant escape)\b"),
        CrisisRule::new("shouldnt_exist", EmotionalIntent, Media,
            r"\b(shouldn't exist|shouldnt exist)\b"),
        CrisisRule::new("cant_see_point", EmotionalIntent, Media,
            r"\b(no future|can't see|cant see)\b.*\bpoint\b"),
        CrisisRule::new("dont_feel_anything", EmotionalIntent, Media,
            r"\b(empty inside|feel nothing|don't feel|dont feel)\b.*\banything\b"),
        CrisisRule::new("hopeless", EmotionalIntent, Reply,
            r"\b(no hope|hopeless|helpless|lost)\b"),
        CrisisRule::new("what_if_gone", EmotionalIntent, Reply,
            r"\bwhat if i\b.*\b(just|never|didn't|didnt)\b.*\b(existed|wake up|come back)\b"),
        // --- Layer 2: linguistic risk ---
        CrisisRule::new("better_off_without_me", LinguisticRisk, Media,
            r"\b(better off|world would be better)\b.*\b(without me|if i wasn't|if i wasnt)\b"),
        CrisisRule::new("burden", LinguisticRisk, Media,
            r"\b(burden|waste of space|shouldn't be here|shouldnt be here)\b"),
        CrisisRule::new("cant_do_this_anymore", LinguisticRisk, Media,
            r"\b(can't do this|cant do this|too much|overwhelming)\b.*\b(anymore|longer|much longer)\b"),
        // --- Layer 3: keyword failsafe ---
        CrisisRule::new("suicidal_statement", KeywordFailsafe, Mood,
            r"\b(suicide|suicidal|kill myself|end my life|end myself)\b"),
        CrisisRule::new("want_to_die", KeywordFailsafe, Mood,
            r"\b(want to die|wanna die|wish i was dead|better off dead)\b"),
        CrisisRule::new("jump_from_height", KeywordFailsafe, Mood,
            r"\b(jump|jumping)\b.*\b(from|off|roof|building|bridge)\b"),
        CrisisRule::new("end_myself", KeywordFailsafe, Mood,
            r"\b(destroy|end|finish)\b.*\b(myself|me|my life)\b"),
        CrisisRule::new("lone_word", KeywordFailsafe, Mood,
            r"^\s*(jump|roof|end|die|suicide)\.?\s*$"),
        CrisisRule::new("self_harm", KeywordFailsafe, Media,
            r"\b(self harm|cut myself|hurt myself|harm myself)\b"),
        CrisisRule::new("method", KeywordFailsafe, Media,
            r"\b(overdose|pills|hang myself)\b"),
    ]
});

/// Hopelessness without an acute signal. Produces the medium tier.
static MEDIUM_RISK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(hopeless|no hope|can't take it|cant take it|pointless|no reason to live|tired of living|don't care anymore|nothing matters)\b",
    )
    .unwrap()
});

/// All rules in evaluation order.
pub fn rules() -> &'static [CrisisRule] {
    &RULES
}

/// Look up a rule by name.
pub fn rule(name: &str) -> Option<&'static CrisisRule> {
    RULES.iter().find(|r| r.name == name)
}

// ============================================================================
// Classifier
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct CrisisClassifier {
    scope: CrisisScope,
}

impl CrisisClassifier {
    pub fn new(scope: CrisisScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> CrisisScope {
        self.scope
    }

    /// Classify one message. `text` is normalized before matching.
    pub fn assess(&self, text: &str) -> CrisisVerdict {
        let text = crate::normalize(text);

        if let Some(hit) = RULES
            .iter()
            .filter(|r| r.scope <= self.scope)
            .find(|r| r.matches(&text))
        {
            return CrisisVerdict {
                at_risk: true,
                tier: CrisisTier::High,
                layer: Some(hit.layer),
                rule: Some(hit.name),
            };
        }

        if MEDIUM_RISK.is_match(&text) {
            return CrisisVerdict {
                at_risk: false,
                tier: CrisisTier::Medium,
                layer: None,
                rule: Some("medium_risk"),
            };
        }

        CrisisVerdict::none()
    }
}
