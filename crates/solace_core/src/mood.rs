use crate::catalogue::Category;
use crate::ranker::CategoryMatch;
use crate::safety::CrisisVerdict;
use serde::{Deserialize, Serialize};

/// Most supporting categories a summary carries.
pub const MAX_SUPPORTING: usize = 2;

/// Condensed read of the user's emotional state for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodSummary {
    pub dominant: Category,
    #[serde(default)]
    pub supporting: Vec<Category>,
    /// Share of the dominant score among all surviving scores, in [0, 1].
    #[serde(default)]
    pub confidence: f32,
}

impl MoodSummary {
    pub fn neutral() -> Self {
        Self {
            dominant: Category::General,
            supporting: Vec::new(),
            confidence: 0.0,
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.dominant == Category::General && self.supporting.is_empty()
    }
}

impl Default for MoodSummary {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Derive a mood from ranked matches.
///
/// `suicide` only survives while the current turn is at risk, so stale crisis
/// keywords in the history never colour the mood of a calm turn.
pub fn synthesize(matches: &[CategoryMatch<'_>], verdict: &CrisisVerdict) -> MoodSummary {
    let surviving: Vec<&CategoryMatch<'_>> = matches
        .iter()
        .filter(|m| verdict.at_risk || m.name() != Category::Suicide)
        .collect();

    let Some(first) = surviving.first() else {
        return MoodSummary::neutral();
    };

    let total: u32 = surviving.iter().map(|m| m.score).sum();
    let confidence = if total == 0 {
        0.0
    } else {
        (first.score as f32 / total as f32).min(1.0)
    };

    MoodSummary {
        dominant: first.name(),
        supporting: surviving
            .iter()
            .skip(1)
            .take(MAX_SUPPORTING)
            .map(|m| m.name())
            .collect(),
        confidence,
    }
}
