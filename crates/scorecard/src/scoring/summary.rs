use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Score achieved by one distinct rule during an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredRule {
    pub rule_key: String,
    pub score: u32,
    pub max_score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Subtotal for one rule group across every applicable rule-set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupScore {
    pub group_key: String,
    pub score: u32,
    pub max_score: u32,
}

/// Full result of one evaluation: grand total, per-group, and per-rule
/// scores, keyed by string so the structure serializes stably for caches and
/// presentation layers.
///
/// `group_scores` are additive views over the deduplicated `rule_scores`: a
/// rule shared by groups of two applicable categories counts toward each
/// group's subtotal, while `total_score`/`total_max_score` always sum the
/// deduplicated rule map, so group subtotals may legitimately exceed the
/// grand total when groups overlap.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub rule_scores: BTreeMap<String, ScoredRule>,
    pub group_scores: BTreeMap<String, GroupScore>,
    pub total_score: u32,
    pub total_max_score: u32,
}

impl ScoreSummary {
    /// The summary for an entity with no applicable rule-sets.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Percent of achievable points earned, rounded to nearest. An empty
    /// summary is vacuously complete so it never triggers readiness prompts.
    pub fn completion_percent(&self) -> u8 {
        if self.total_max_score == 0 {
            return 100;
        }
        ((self.total_score * 100 + self.total_max_score / 2) / self.total_max_score) as u8
    }

    /// Rules that scored below their maximum, in key order.
    pub fn gaps(&self) -> impl Iterator<Item = &ScoredRule> {
        self.rule_scores
            .values()
            .filter(|scored| scored.score < scored.max_score)
    }
}
