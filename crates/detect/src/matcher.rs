//! Cross-platform event matching.
//!
//! Groups normalized markets from different platforms into
//! [`MatchedEvent`]s by keyword similarity. This is a single-pass greedy
//! matcher, not a global assignment: the first platform seen acts as
//! primary, and a candidate consumed by an earlier primary market is gone
//! even if a later pairing would have scored higher. That bias is part of
//! the behavior, kept deliberately.

use std::collections::{BTreeSet, HashSet};

use edgescan_core::NormalizedMarket;
use tracing::{debug, info};

use crate::keywords::{extract_keywords, is_bonus_year, is_named_entity};
use crate::types::MatchedEvent;

/// Flat similarity bonus when a shared keyword is a curated named entity.
const ENTITY_BONUS: f64 = 0.2;

/// Flat similarity bonus when a shared keyword is a year in 2024-2028.
const YEAR_BONUS: f64 = 0.15;

/// Configuration for event matching.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Minimum similarity score required to pair two markets (0.0 to 1.0).
    pub similarity_threshold: f64,

    /// Maximum characters of the primary question kept as the event name.
    pub name_len: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.45,
            name_len: 80,
        }
    }
}

impl MatchConfig {
    /// Sets the similarity threshold.
    #[must_use]
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }
}

/// Matches semantically identical events across platforms.
#[derive(Debug, Clone)]
pub struct EventMatcher {
    config: MatchConfig,
}

impl EventMatcher {
    /// Creates a matcher with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MatchConfig::default(),
        }
    }

    /// Creates a matcher with a custom configuration.
    #[must_use]
    pub fn with_config(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Groups markets into cross-platform events.
    ///
    /// Markets from the first platform seen act as primaries; every other
    /// platform contributes at most its best-scoring unconsumed candidate
    /// per primary. Only events spanning more than one platform are
    /// emitted. Markets whose questions yield no keywords are never
    /// matched.
    #[must_use]
    pub fn match_markets(&self, markets: &[NormalizedMarket]) -> Vec<MatchedEvent> {
        if markets.is_empty() {
            return Vec::new();
        }

        // Partition by platform, preserving first-seen order.
        let mut platforms: Vec<(&str, Vec<&NormalizedMarket>)> = Vec::new();
        for market in markets {
            match platforms.iter_mut().find(|(p, _)| *p == market.platform) {
                Some((_, group)) => group.push(market),
                None => platforms.push((market.platform.as_str(), vec![market])),
            }
        }

        let Some(((_, primaries), others)) = platforms.split_first() else {
            return Vec::new();
        };

        let mut events = Vec::new();
        let mut used: HashSet<String> = HashSet::new();

        for primary in primaries {
            let primary_key = primary.key();
            if used.contains(&primary_key) {
                continue;
            }

            let keywords = extract_keywords(&primary.question);
            if keywords.is_empty() {
                continue;
            }

            // Best unconsumed candidate from each other platform.
            let mut matches: Vec<(&NormalizedMarket, f64, String)> = Vec::new();
            for (_, candidates) in others {
                let mut best: Option<(&NormalizedMarket, f64, String)> = None;
                let mut best_score = 0.0_f64;

                for candidate in candidates.iter().copied() {
                    if used.contains(&candidate.key()) {
                        continue;
                    }
                    let candidate_keywords = extract_keywords(&candidate.question);
                    let (score, reason) = similarity(&keywords, &candidate_keywords);
                    if score > best_score && score >= self.config.similarity_threshold {
                        best_score = score;
                        best = Some((candidate, score, reason));
                    }
                }

                if let Some(found) = best {
                    matches.push(found);
                }
            }

            if !matches.is_empty() {
                let mut event = MatchedEvent {
                    name: truncate(&primary.question, self.config.name_len),
                    category: primary.category,
                    markets: Default::default(),
                    keywords: keywords.clone(),
                    confidence: 0.0,
                    match_reason: String::new(),
                };

                event
                    .markets
                    .insert(primary.platform.clone(), (*primary).clone());
                used.insert(primary_key.clone());

                for (candidate, score, reason) in matches {
                    let candidate_key = candidate.key();
                    if !used.contains(&candidate_key) {
                        event
                            .markets
                            .insert(candidate.platform.clone(), candidate.clone());
                        used.insert(candidate_key);
                        event.confidence = event.confidence.max(score);
                        event.match_reason = reason;
                    }
                }

                if event.num_platforms() > 1 {
                    debug!(
                        name = %event.name,
                        platforms = event.num_platforms(),
                        confidence = event.confidence,
                        "matched cross-platform event"
                    );
                    events.push(event);
                }
            }

            used.insert(primary_key);
        }

        info!(matched = events.len(), "cross-platform event matching complete");
        events
    }
}

impl Default for EventMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Similarity between two keyword sets: Jaccard index plus flat bonuses
/// for shared named entities and shared years, capped at 1.0.
///
/// Returns `(0.0, "")` when either set is empty or nothing is shared.
#[must_use]
pub fn similarity(kw1: &BTreeSet<String>, kw2: &BTreeSet<String>) -> (f64, String) {
    if kw1.is_empty() || kw2.is_empty() {
        return (0.0, String::new());
    }

    let common: Vec<&String> = kw1.intersection(kw2).collect();
    if common.is_empty() {
        return (0.0, String::new());
    }

    let union_len = kw1.union(kw2).count();
    let jaccard = common.len() as f64 / union_len as f64;

    let entity_bonus = if common.iter().any(|kw| is_named_entity(kw)) {
        ENTITY_BONUS
    } else {
        0.0
    };
    let year_bonus = if common.iter().any(|kw| is_bonus_year(kw)) {
        YEAR_BONUS
    } else {
        0.0
    };

    let score = (jaccard + entity_bonus + year_bonus).min(1.0);
    let shared: Vec<&str> = common.iter().take(5).map(|s| s.as_str()).collect();
    (score, format!("Common: {}", shared.join(", ")))
}

/// Truncates on a character boundary.
fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
