//! Keyword, topic, threshold, and direction extraction from question text.
//!
//! The vocabularies here are fixed configuration data: curated named
//! entities, action words, and topic keywords. Nothing is inferred from the
//! corpus at runtime.

use std::collections::BTreeSet;

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Curated named entities: people, organizations, countries, hot topics.
/// Shared keywords from this list strengthen an event match.
const NAMED_ENTITIES: &[&str] = &[
    // People
    "trump", "biden", "harris", "vance", "newsom", "desantis", "musk", "elon", "starmer", "keir",
    "putin", "zelensky", "xi", "macron", "scholz", "modi", "khamenei", "netanyahu", "trudeau",
    "milei", "altman", "zuckerberg",
    // Organizations
    "nato", "fed", "sec", "congress", "senate", "supreme", "court", "spacex", "tesla", "openai",
    "twitter", "meta", "google",
    // Countries and regions
    "ukraine", "russia", "china", "iran", "israel", "gaza", "greenland", "taiwan", "uk", "britain",
    "us", "usa", "america",
    // Topics
    "recession", "ceasefire", "war", "pandemic", "bitcoin", "btc", "crypto", "election",
    "president", "impeach", "veto",
];

/// Action words that anchor what a question asks.
const ACTION_WORDS: &[&str] = &[
    "win", "lose", "leave", "remain", "resign", "ceasefire", "recession", "cut", "raise", "reach",
    "hit", "join",
];

/// Returns true if the word is in the curated named-entity list.
#[must_use]
pub fn is_named_entity(word: &str) -> bool {
    NAMED_ENTITIES.contains(&word)
}

/// Returns true for the 4-digit years that carry a match bonus.
#[must_use]
pub fn is_bonus_year(word: &str) -> bool {
    matches!(word, "2024" | "2025" | "2026" | "2027" | "2028")
}

/// Extracts the matching-relevant keyword set from question text:
/// named entities, years 2024-2029, and action words.
#[must_use]
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    let mut keywords = BTreeSet::new();

    for word in lower.split(|c: char| !c.is_ascii_alphanumeric()) {
        if word.is_empty() {
            continue;
        }
        let is_year =
            word.len() == 4 && word.starts_with("202") && word.ends_with(|c| ('4'..='9').contains(&c));
        if NAMED_ENTITIES.contains(&word) || ACTION_WORDS.contains(&word) || is_year {
            keywords.insert(word.to_string());
        }
    }
    keywords
}

// =============================================================================
// Topics
// =============================================================================

/// Coarse subject tag used to group markets for delta detection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Topic {
    Btc,
    Eth,
    Sol,
    Xrp,
    Doge,
    Trump,
    Biden,
    Harris,
    Musk,
    FedRate,
    Inflation,
    Gdp,
    Tesla,
    Sp500,
    Nasdaq,
    Nvidia,
    Other,
}

/// Topic keyword table, in tie-break priority order. Matching is
/// substring-based over the lowercased question ("sol " keeps its trailing
/// space so "solution" does not hit).
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::Btc, &["bitcoin", "btc"]),
    (Topic::Eth, &["ethereum", "eth"]),
    (Topic::Sol, &["solana", "sol "]),
    (Topic::Xrp, &["xrp", "ripple"]),
    (Topic::Doge, &["dogecoin", "doge"]),
    (Topic::Trump, &["trump"]),
    (Topic::Biden, &["biden"]),
    (Topic::Harris, &["harris"]),
    (Topic::Musk, &["musk", "elon"]),
    (Topic::FedRate, &["fed", "interest rate", "federal reserve"]),
    (Topic::Inflation, &["inflation", "cpi"]),
    (Topic::Gdp, &["gdp"]),
    (Topic::Tesla, &["tesla", "tsla"]),
    (Topic::Sp500, &["sp500", "s&p", "spy"]),
    (Topic::Nasdaq, &["nasdaq", "qqq"]),
    (Topic::Nvidia, &["nvidia", "nvda"]),
];

impl Topic {
    /// Infers the topic with the most keyword hits; earlier table entries
    /// win ties; zero hits falls through to [`Topic::Other`].
    #[must_use]
    pub fn infer(question: &str) -> Self {
        let q = question.to_lowercase();

        let mut best = Topic::Other;
        let mut best_hits = 0usize;
        for (topic, keywords) in TOPIC_KEYWORDS {
            let hits = keywords.iter().filter(|kw| q.contains(*kw)).count();
            if hits > best_hits {
                best_hits = hits;
                best = *topic;
            }
        }
        best
    }

    /// Display tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Eth => "ETH",
            Self::Sol => "SOL",
            Self::Xrp => "XRP",
            Self::Doge => "DOGE",
            Self::Trump => "TRUMP",
            Self::Biden => "BIDEN",
            Self::Harris => "HARRIS",
            Self::Musk => "MUSK",
            Self::FedRate => "FED_RATE",
            Self::Inflation => "INFLATION",
            Self::Gdp => "GDP",
            Self::Tesla => "TESLA",
            Self::Sp500 => "SP500",
            Self::Nasdaq => "NASDAQ",
            Self::Nvidia => "NVIDIA",
            Self::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Direction
// =============================================================================

/// Which way a threshold question points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Price must rise to the threshold (reach/hit/above/over/exceed).
    Reach,
    /// Price must fall to the threshold (dip/fall/below/drop/under).
    Dip,
    /// No direction word found.
    Unknown,
}

impl Direction {
    /// Extracts the direction from question text.
    ///
    /// Checked in the order above-class, below-class, reach-class: a
    /// question containing both "fall" and "reach" resolves to Dip.
    #[must_use]
    pub fn extract(question: &str) -> Self {
        let q = question.to_lowercase();

        if ["above", "over", "exceed"].iter().any(|w| q.contains(w)) {
            Self::Reach
        } else if ["below", "under", "drop", "fall", "dip"]
            .iter()
            .any(|w| q.contains(w))
        {
            Self::Dip
        } else if ["reach", "hit"].iter().any(|w| q.contains(w)) {
            Self::Reach
        } else {
            Self::Unknown
        }
    }
}

// =============================================================================
// Thresholds
// =============================================================================

/// Extracts one numeric price threshold per question via ordered regex
/// attempts: `$N K`, then `$N M`, then a bare `$N`.
///
/// A candidate in the 2020-2030 range is a year, and one below 100 is
/// noise; both are rejected *before* the unit multiplier is applied, and
/// rejection moves on to the next pattern.
#[derive(Debug, Clone)]
pub struct ThresholdExtractor {
    patterns: Vec<(Regex, Decimal)>,
}

impl ThresholdExtractor {
    /// Compiles the threshold patterns.
    #[must_use]
    pub fn new() -> Self {
        let patterns = vec![
            (
                Regex::new(r"\$\s*([\d,]+(?:\.\d+)?)\s*[kK]").expect("valid regex"),
                dec!(1000),
            ),
            (
                Regex::new(r"\$\s*([\d,]+(?:\.\d+)?)\s*[mM]").expect("valid regex"),
                dec!(1000000),
            ),
            (
                Regex::new(r"\$\s*([\d,]+(?:\.\d+)?)").expect("valid regex"),
                Decimal::ONE,
            ),
        ];
        Self { patterns }
    }

    /// Returns the first accepted threshold, scaled to dollars.
    #[must_use]
    pub fn extract(&self, question: &str) -> Option<Decimal> {
        for (pattern, multiplier) in &self.patterns {
            let Some(captures) = pattern.captures(question) else {
                continue;
            };
            let raw = captures.get(1)?.as_str().replace(',', "");
            let Ok(value) = raw.parse::<Decimal>() else {
                continue;
            };

            if value >= dec!(2020) && value <= dec!(2030) {
                continue;
            }
            if value < dec!(100) {
                continue;
            }

            return Some(value * multiplier);
        }
        None
    }
}

impl Default for ThresholdExtractor {
    fn default() -> Self {
        Self::new()
    }
}
