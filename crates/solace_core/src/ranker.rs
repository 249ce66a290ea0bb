//! Keyword scoring of the catalogue against a conversation.
//!
//! A keyword found in the latest user turn weighs more than one that only
//! appears earlier in the history.

use crate::catalogue::{Catalogue, Category, EmotionalCategory};
use crate::{normalize, Conversation};

/// Weight of a keyword found in the latest user turn.
pub const LATEST_WEIGHT: u32 = 2;
/// Weight of a keyword found only in earlier user turns.
pub const HISTORY_WEIGHT: u32 = 1;

#[derive(Debug, Clone, Copy)]
pub struct CategoryMatch<'a> {
    pub category: &'a EmotionalCategory,
    pub score: u32,
}

impl CategoryMatch<'_> {
    pub fn name(&self) -> Category {
        self.category.name
    }
}

/// Score every category and return the non-zero ones, best first.
///
/// Ties keep catalogue declaration order.
pub fn rank<'a>(catalogue: &'a Catalogue, conversation: &Conversation) -> Vec<CategoryMatch<'a>> {
    let history = conversation
        .user_turns()
        .map(|t| normalize(&t.text))
        .collect::<Vec<_>>()
        .join(" ");
    let latest = conversation.latest_user_text();
    rank_texts(catalogue, &latest, &history)
}

/// Ranking over already-normalized text.
pub fn rank_texts<'a>(catalogue: &'a Catalogue, latest: &str, history: &str) -> Vec<CategoryMatch<'a>> {
    let mut matches: Vec<CategoryMatch<'a>> = catalogue
        .categories()
        .iter()
        .filter_map(|category| {
            let score = category
                .keywords
                .iter()
                .map(|keyword| {
                    if latest.contains(keyword.as_str()) {
                        LATEST_WEIGHT
                    } else if history.contains(keyword.as_str()) {
                        HISTORY_WEIGHT
                    } else {
                        0
                    }
                })
                .sum::<u32>();
            (score > 0).then_some(CategoryMatch { category, score })
        })
        .collect();

    // `sort_by` is stable, which keeps declaration order on ties.
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}
