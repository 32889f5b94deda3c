use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::debug;

use super::catalog::{RuleSetCatalog, RuleSetView};
use super::domain::OrganizationProfile;
use super::registry::{ConfigurationError, Rule, RuleComputationError, RuleRegistry};
use super::summary::{GroupScore, ScoreSummary, ScoredRule};

/// Failure of one evaluation call. Configuration defects and rule
/// computation failures both abort the evaluation; no partial summary is
/// ever produced.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("rule '{rule_key}' failed to compute: {source}")]
    Rule {
        rule_key: String,
        #[source]
        source: RuleComputationError,
    },
}

/// Coordinates rule selection, concurrent execution, and aggregation.
///
/// Registry and catalog are injected, immutable, and shared; concurrent
/// `evaluate` calls for different profiles need no synchronization.
pub struct ScoringOrchestrator {
    registry: Arc<RuleRegistry>,
    catalog: Arc<RuleSetCatalog>,
}

impl std::fmt::Debug for ScoringOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringOrchestrator").finish_non_exhaustive()
    }
}

impl ScoringOrchestrator {
    /// Validates the catalog against the registry before accepting it, so
    /// unknown rule keys and duplicated group memberships surface at startup
    /// instead of mid-evaluation.
    pub fn new(
        registry: Arc<RuleRegistry>,
        catalog: Arc<RuleSetCatalog>,
    ) -> Result<Self, ConfigurationError> {
        catalog.validate(&registry)?;
        Ok(Self { registry, catalog })
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &RuleSetCatalog {
        &self.catalog
    }

    /// Metadata view for one category, or `None` when the category has no
    /// registered rule-set.
    pub fn ruleset_view(&self, category: &str) -> Option<RuleSetView> {
        self.catalog
            .rule_set_for(category)
            .map(|rule_set| rule_set.view(&self.registry))
    }

    /// Scores one profile snapshot.
    ///
    /// Every distinct rule referenced by the profile's applicable rule-sets
    /// runs exactly once, concurrently; group subtotals then re-walk the
    /// group memberships over the deduplicated results. Dropping the
    /// returned future cancels in-flight rule computations, and the first
    /// rule failure cancels the rest.
    pub async fn evaluate(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<ScoreSummary, EvaluationError> {
        // Ordered (group, rule) memberships across every applicable
        // rule-set, plus the distinct keys in first-seen order with the
        // category that first referenced them.
        let mut pairs: Vec<(&'static str, &'static str)> = Vec::new();
        let mut distinct: Vec<(&'static str, &'static str)> = Vec::new();
        for category in &profile.categories {
            let rule_set = match self.catalog.rule_set_for(category) {
                Some(rule_set) => rule_set,
                None => continue,
            };
            for group in &rule_set.groups {
                for rule_key in &group.rule_keys {
                    pairs.push((group.key, *rule_key));
                    if !distinct.iter().any(|(key, _)| key == rule_key) {
                        distinct.push((*rule_key, rule_set.category));
                    }
                }
            }
        }

        if pairs.is_empty() {
            return Ok(ScoreSummary::empty());
        }

        // Resolve every key before executing anything; an unresolved key is
        // a deployment defect, not a per-profile condition.
        let mut selected: Vec<(&'static str, Arc<dyn Rule>)> = Vec::with_capacity(distinct.len());
        for (rule_key, category) in &distinct {
            let rule = self.registry.resolve(rule_key).ok_or_else(|| {
                ConfigurationError::UnknownRule {
                    rule_set: (*category).to_string(),
                    rule_key: (*rule_key).to_string(),
                }
            })?;
            selected.push((*rule_key, Arc::clone(rule)));
        }

        debug!(
            slug = %profile.slug,
            rules = selected.len(),
            memberships = pairs.len(),
            "fanning out rule computations"
        );

        let computations = selected.iter().map(|(rule_key, rule)| {
            let rule = Arc::clone(rule);
            async move {
                let outcome =
                    rule.compute(profile)
                        .await
                        .map_err(|source| EvaluationError::Rule {
                            rule_key: (*rule_key).to_string(),
                            source,
                        })?;
                if outcome.score > rule.max_score() {
                    return Err(EvaluationError::Configuration(
                        ConfigurationError::ScoreAboveMaximum {
                            rule_key: (*rule_key).to_string(),
                            score: outcome.score,
                            max_score: rule.max_score(),
                        },
                    ));
                }
                Ok((*rule_key, rule.max_score(), outcome))
            }
        });
        let outcomes = try_join_all(computations).await?;

        let mut rule_scores: BTreeMap<String, ScoredRule> = BTreeMap::new();
        for (rule_key, max_score, outcome) in outcomes {
            rule_scores.insert(
                rule_key.to_string(),
                ScoredRule {
                    rule_key: rule_key.to_string(),
                    score: outcome.score,
                    max_score,
                    note: outcome.note,
                },
            );
        }

        // Group subtotals fold every membership over the already-computed
        // rule scores; a rule shared across groups counts toward each.
        let mut group_scores: BTreeMap<String, GroupScore> = BTreeMap::new();
        for (group_key, rule_key) in &pairs {
            let scored = rule_scores
                .get(*rule_key)
                .expect("every collected rule key is scored");
            let entry = group_scores
                .entry((*group_key).to_string())
                .or_insert_with(|| GroupScore {
                    group_key: (*group_key).to_string(),
                    score: 0,
                    max_score: 0,
                });
            entry.score += scored.score;
            entry.max_score += scored.max_score;
        }

        // Grand totals sum the deduplicated rule map only; summing the
        // possibly-overlapping group subtotals would double count.
        let total_score = rule_scores.values().map(|scored| scored.score).sum();
        let total_max_score = rule_scores.values().map(|scored| scored.max_score).sum();

        Ok(ScoreSummary {
            rule_scores,
            group_scores,
            total_score,
            total_max_score,
        })
    }
}
