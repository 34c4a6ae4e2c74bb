// Category matching: does a description mention any of a category's keywords?
//
// The default mode is a literal case-insensitive substring test, which is
// what the keyword tables were tuned against. It over-matches short keywords:
// "ai" hits "domain" and "said". Token mode requires the keyword to sit
// between non-word characters instead.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::taxonomy::ExpandedKeywordSet;

/// How a keyword is located in a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Keyword appears anywhere, including inside other words.
    #[default]
    Substring,
    /// Keyword appears as a whole word or phrase.
    Token,
}

impl std::str::FromStr for MatchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "token" => Ok(Self::Token),
            other => anyhow::bail!("Unknown match mode {other:?} (expected substring or token)"),
        }
    }
}

enum Pattern {
    Substring(String),
    Token(Regex),
}

impl Pattern {
    fn build(keyword: &str, mode: MatchMode) -> Option<Self> {
        let keyword = keyword.to_lowercase();
        if keyword.is_empty() {
            return None;
        }
        Some(match mode {
            MatchMode::Substring => Self::Substring(keyword),
            MatchMode::Token => {
                let pattern = format!(r"(?:^|\W){}(?:\W|$)", regex_lite::escape(&keyword));
                // An escaped literal wrapped in fixed groups always compiles.
                Self::Token(Regex::new(&pattern).ok()?)
            }
        })
    }

    fn is_match(&self, lowered: &str) -> bool {
        match self {
            Self::Substring(kw) => lowered.contains(kw.as_str()),
            Self::Token(re) => re.is_match(lowered),
        }
    }
}

/// Precompiled keyword patterns for every category.
pub struct CategoryMatcher {
    categories: Vec<(String, Vec<Pattern>)>,
}

impl CategoryMatcher {
    pub fn new(keywords: &ExpandedKeywordSet, mode: MatchMode) -> Self {
        let categories = keywords
            .iter()
            .map(|(label, words)| {
                let patterns = words
                    .iter()
                    .filter_map(|w| Pattern::build(w, mode))
                    .collect();
                (label.clone(), patterns)
            })
            .collect();
        Self { categories }
    }

    /// Labels of every category with at least one keyword in `description`,
    /// in label order.
    pub fn match_categories(&self, description: &str) -> Vec<String> {
        let lowered = description.to_lowercase();
        self.categories
            .iter()
            .filter(|(_, patterns)| patterns.iter().any(|p| p.is_match(&lowered)))
            .map(|(label, _)| label.clone())
            .collect()
    }
}

/// One-shot substring matching of `description` against `keywords`.
pub fn match_categories(description: &str, keywords: &ExpandedKeywordSet) -> Vec<String> {
    CategoryMatcher::new(keywords, MatchMode::Substring).match_categories(description)
}
