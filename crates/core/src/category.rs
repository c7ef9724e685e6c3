//! Coarse market categorization.
//!
//! Inference is a declarative keyword table scored uniformly: the category
//! with the most keyword hits in the question wins, earlier table entries
//! win ties, and zero hits falls through to [`Category::Other`].

use serde::{Deserialize, Serialize};

/// Coarse market category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Politics,
    Crypto,
    Sports,
    Economics,
    Entertainment,
    Science,
    Other,
}

/// Keyword table driving inference, in tie-break priority order.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Politics,
        &[
            "trump", "biden", "harris", "election", "president", "congress", "senate", "vote",
            "impeach",
        ],
    ),
    (
        Category::Crypto,
        &[
            "bitcoin", "btc", "ethereum", "eth", "solana", "crypto", "token", "defi",
        ],
    ),
    (
        Category::Sports,
        &[
            "nfl",
            "nba",
            "mlb",
            "super bowl",
            "championship",
            "world cup",
            "game",
        ],
    ),
    (
        Category::Economics,
        &[
            "fed",
            "interest rate",
            "inflation",
            "cpi",
            "gdp",
            "recession",
            "economy",
        ],
    ),
    (
        Category::Entertainment,
        &["oscar", "grammy", "movie", "album", "celebrity", "box office"],
    ),
    (
        Category::Science,
        &["nasa", "spacex", "launch", "vaccine", "climate", "fusion"],
    ),
];

impl Category {
    /// Infers a category from question text.
    ///
    /// Keyword matching is substring-based over the lowercased question.
    #[must_use]
    pub fn infer(question: &str) -> Self {
        let q = question.to_lowercase();

        let mut best = Category::Other;
        let mut best_hits = 0usize;
        for (category, keywords) in CATEGORY_KEYWORDS {
            let hits = keywords.iter().filter(|kw| q.contains(*kw)).count();
            if hits > best_hits {
                best_hits = hits;
                best = *category;
            }
        }
        best
    }

    /// Display name matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Politics => "politics",
            Self::Crypto => "crypto",
            Self::Sports => "sports",
            Self::Economics => "economics",
            Self::Entertainment => "entertainment",
            Self::Science => "science",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
