//! Static catalogue of emotional categories.
//!
//! Declaration order matters: the ranker breaks score ties by it, which in turn
//! decides whose media and guidance win downstream.

use crate::MediaItem;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Anxiety,
    Panic,
    Depression,
    Stress,
    Suicide,
    Addiction,
    Loneliness,
    Burnout,
    #[default]
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Anxiety => "anxiety",
            Category::Panic => "panic",
            Category::Depression => "depression",
            Category::Stress => "stress",
            Category::Suicide => "suicide",
            Category::Addiction => "addiction",
            Category::Loneliness => "loneliness",
            Category::Burnout => "burnout",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionalCategory {
    pub name: Category,
    pub keywords: Vec<String>,
    /// Free text handed to a generative backend as behavioural guidance.
    pub guidance: String,
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

#[derive(Debug, Clone)]
pub struct Catalogue {
    categories: Vec<EmotionalCategory>,
}

#[derive(Deserialize)]
struct CatalogueFile {
    #[serde(rename = "category")]
    categories: Vec<EmotionalCategory>,
}

impl Catalogue {
    /// Validate and normalize a list of categories.
    pub fn from_categories(mut categories: Vec<EmotionalCategory>) -> Result<Self> {
        let mut seen = HashSet::new();
        for category in &mut categories {
            if !seen.insert(category.name) {
                bail!("Category '{}' is declared more than once", category.name);
            }
            category.keywords = category
                .keywords
                .iter()
                .map(|k| crate::normalize(k.trim()))
                .filter(|k| !k.is_empty())
                .collect();
        }
        Ok(Self { categories })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogueFile =
            toml::from_str(content).with_context(|| "Failed to parse catalogue TOML")?;
        Self::from_categories(file.categories)
    }

    /// Load a replacement catalogue from a TOML file of `[[category]]` tables.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read catalogue file: {}", path.as_ref().display())
        })?;
        let catalogue = Self::from_toml_str(&content)?;
        tracing::info!(
            "Loaded {} categories from {}",
            catalogue.categories.len(),
            path.as_ref().display()
        );
        Ok(catalogue)
    }

    pub fn categories(&self) -> &[EmotionalCategory] {
        &self.categories
    }

    pub fn get(&self, name: Category) -> Option<&EmotionalCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// The catalogue shipped with the engine.
    pub fn builtin() -> Self {
        let categories = BUILTIN
            .iter()
            .map(|(name, keywords, guidance, media)| EmotionalCategory {
                name: *name,
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
                guidance: guidance.to_string(),
                media: media
                    .iter()
                    .map(|(label, url)| MediaItem::new(label, url))
                    .collect(),
            })
            .collect();
        Self { categories }
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// Built-in data
// ============================================================================

type Entry = (
    Category,
    &'static [&'static str],
    &'static str,
    &'static [(&'static str, &'static str)],
);

const BUILTIN: &[Entry] = &[
    (
        Category::Anxiety,
        &[
            "anxious", "off", "worried", "nervous", "scared", "overwhelmed", "jitters", "uneasy",
            "panic", "racing", "restless", "tense",
        ],
        "Signal: anxiety or worry. Stay calm and grounding; offer a breathing or grounding exercise.",
        &[
            ("English", "https://vimeo.com/906267109"),
            ("Tamil", "https://vimeo.com/950436071"),
            ("Telugu", "https://vimeo.com/909774178"),
            ("Kannada", "https://vimeo.com/916772627"),
            ("Hindi", "https://vimeo.com/911094873"),
        ],
    ),
    (
        Category::Panic,
        &[
            "panic", "panic attack", "can't breathe", "heart racing", "hyperventilating",
            "shaking", "dizzy", "chest tight",
        ],
        "Signal: acute panic. Ground immediately and guide slow breathing, one step at a time.",
        &[
            ("English", "https://vimeo.com/911590154"),
            ("Tamil", "https://vimeo.com/950436099"),
            ("Telugu", "https://vimeo.com/911093665"),
            ("Hindi", "https://vimeo.com/911095858"),
        ],
    ),
    (
        Category::Depression,
        &[
            "empty", "sad", "down", "losing interest", "heavy", "dull", "tired of everything",
            "numb", "hopeless", "worthless", "depressed",
        ],
        "Signal: low mood or depression. Acknowledge the weight without rushing to fix it; offer gentle support.",
        &[
            ("English", "https://vimeo.com/924160698"),
            ("Tamil", "https://vimeo.com/963160470"),
            ("Telugu", "https://vimeo.com/924161957"),
            ("Kannada", "https://vimeo.com/927633841"),
            ("Hindi", "https://vimeo.com/927627742"),
        ],
    ),
    (
        Category::Stress,
        &[
            "stress", "pressure", "lot to do", "draining", "can't cope", "spinning", "tight chest",
            "overwhelmed", "tension", "stretched",
        ],
        "Signal: high stress. Name the strain and help break it into one manageable next step.",
        &[
            ("English", "https://vimeo.com/893806989"),
            ("Tamil", "https://vimeo.com/963299560"),
            ("Telugu", "https://vimeo.com/909683248"),
            ("Kannada", "https://vimeo.com/905847143"),
            ("Hindi", "https://vimeo.com/914293058"),
        ],
    ),
    (
        Category::Suicide,
        &[
            "suicide", "suicidal", "end it", "kill myself", "don't want to live", "better off dead",
            "no point", "give up", "end my life", "want to die", "self harm", "cut myself",
            "hurt myself", "overdose", "hopeless", "no hope", "can't take it", "tired of living",
            "nothing matters",
        ],
        "Signal: possible crisis. Bypass every other flow. Give helplines immediately: call or text 988 \
         (Suicide & Crisis Lifeline), text HOME to 741741 (Crisis Text Line), 911 for immediate danger; \
         for hopelessness without immediate danger also SAMHSA 1-800-662-4357. Never minimize, never \
         delay the numbers, never attach media, and stress that help is available around the clock.",
        &[
            ("Understanding Suicidal Thoughts (English)", "https://vimeo.com/945516637"),
            ("Supporting Friends (English)", "https://vimeo.com/945518634"),
            ("Seeking Help (English)", "https://vimeo.com/945518502"),
            ("Coping Strategies (English)", "https://vimeo.com/945516970"),
            ("Understanding Suicidal Thoughts (Tamil)", "https://vimeo.com/1005717697"),
            ("Understanding Suicidal Thoughts (Telugu)", "https://vimeo.com/945539553"),
            ("Understanding Suicidal Thoughts (Kannada)", "https://vimeo.com/954047328"),
            ("Understanding Suicidal Thoughts (Hindi)", "https://vimeo.com/945525886"),
        ],
    ),
    (
        Category::Addiction,
        &[
            "drinking", "alcohol", "drunk", "addiction", "can't stop drinking", "substance",
            "drugs", "relapse", "using again",
        ],
        "Signal: addiction struggles. Be non-judgmental and point toward support resources.",
        &[
            ("English", "https://vimeo.com/983468504"),
            ("Tamil", "https://vimeo.com/1005708644"),
        ],
    ),
    (
        Category::Loneliness,
        &[
            "alone", "lonely", "no one", "isolated", "left out", "nobody understands",
            "disconnected", "empty",
        ],
        "Signal: loneliness. Offer presence first and a gentle sense of connection.",
        &[
            ("English", "https://vimeo.com/906267109"),
            ("Tamil", "https://vimeo.com/950436071"),
            ("Telugu", "https://vimeo.com/909774178"),
            ("Hindi", "https://vimeo.com/911094873"),
        ],
    ),
    (
        Category::Burnout,
        &[
            "burnout", "exhausted", "numb out", "checked out", "can't push anymore",
            "running on fumes", "done with everything", "drained",
        ],
        "Signal: burnout. Validate the need for rest and suggest a real pause.",
        &[
            ("English", "https://vimeo.com/893806989"),
            ("Tamil", "https://vimeo.com/963299124"),
            ("Telugu", "https://vimeo.com/909676804"),
            ("Hindi", "https://vimeo.com/914293691"),
        ],
    ),
    (
        Category::General,
        &[
            "fine", "okay", "idk", "nothing", "meh", "off", "whatever", "don't know", "dunno",
            "not sure", "...",
        ],
        "Signal: unclear or hidden emotion. Probe gently; colour and weather metaphors help name a mood.",
        &[
            ("English", "https://vimeo.com/906267109"),
            ("Coping Strategies", "https://vimeo.com/945516970"),
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order_and_keys() {
        let catalogue = Catalogue::builtin();
        let names: Vec<Category> = catalogue.categories().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                Category::Anxiety,
                Category::Panic,
                Category::Depression,
                Category::Stress,
                Category::Suicide,
                Category::Addiction,
                Category::Loneliness,
                Category::Burnout,
                Category::General,
            ]
        );
    }

    #[test]
    fn test_builtin_keywords_are_lowercase() {
        for category in Catalogue::builtin().categories() {
            for keyword in &category.keywords {
                assert_eq!(keyword, &keyword.to_lowercase(), "in {}", category.name);
            }
        }
    }

    #[test]
    fn test_every_builtin_category_has_media() {
        for category in Catalogue::builtin().categories() {
            assert!(!category.media.is_empty(), "{} has no media", category.name);
        }
    }

    #[test]
    fn test_parse_custom_catalogue() {
        let toml_str = r#"
[[category]]
name = "stress"
keywords = ["Deadline", "  exams "]
guidance = "Keep it practical."

[[category.media]]
label = "Box breathing"
url = "https://example.com/box"
tags = ["breathing"]

[[category]]
name = "general"
keywords = ["meh"]
guidance = "Probe gently."
"#;
        let catalogue = Catalogue::from_toml_str(toml_str).unwrap();
        assert_eq!(catalogue.categories().len(), 2);
        let stress = catalogue.get(Category::Stress).unwrap();
        assert_eq!(stress.keywords, vec!["deadline", "exams"]);
        assert_eq!(stress.media[0].tags, vec!["breathing"]);
        assert!(catalogue.get(Category::General).unwrap().media.is_empty());
        assert!(catalogue.get(Category::Panic).is_none());
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let toml_str = r#"
[[category]]
name = "stress"
keywords = ["a"]
guidance = ""

[[category]]
name = "stress"
keywords = ["b"]
guidance = ""
"#;
        assert!(Catalogue::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let toml_str = r#"
[[category]]
name = "joy"
keywords = ["yay"]
guidance = ""
"#;
        assert!(Catalogue::from_toml_str(toml_str).is_err());
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(Catalogue::load("/nonexistent/catalogue.toml").is_err());
    }
}
