use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::domain::OrganizationProfile;

/// Result of one rule computation: a score within `[0, max_score]` plus an
/// optional note explaining what was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub score: u32,
    pub note: Option<String>,
}

impl RuleOutcome {
    pub fn scored(score: u32) -> Self {
        Self { score, note: None }
    }

    pub fn with_note(score: u32, note: impl Into<String>) -> Self {
        Self {
            score,
            note: Some(note.into()),
        }
    }
}

/// Raised when a rule cannot produce a score at all.
///
/// Rules are expected to degrade to `(0, note)` when a fact is merely
/// missing; this error is reserved for computations that cannot complete,
/// and it fails the whole evaluation.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct RuleComputationError {
    message: String,
}

impl RuleComputationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A named, pure evaluation unit over a profile snapshot.
///
/// The orchestrator runs all selected rules concurrently against the same
/// immutable snapshot, so implementations must not mutate shared state and
/// must not read other rules' results.
#[async_trait]
pub trait Rule: Send + Sync {
    /// Stable identifier used for lookup and deduplication across rule-sets.
    fn key(&self) -> &'static str;

    fn label(&self) -> &'static str;

    /// Ceiling for this rule's contribution. The orchestrator rejects any
    /// outcome above it instead of clamping.
    fn max_score(&self) -> u32;

    /// Guidance rendered by operator views when the rule scores below its
    /// maximum.
    fn remediation(&self) -> Option<&'static str> {
        None
    }

    async fn compute(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError>;
}

/// Defects in the compiled-in rule configuration. These describe a broken
/// deployment, not a property of any particular profile, and are never
/// coerced into zero scores.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("rule '{rule_key}' is registered more than once")]
    DuplicateRegistration { rule_key: String },
    #[error("rule-set '{rule_set}' references unknown rule '{rule_key}'")]
    UnknownRule { rule_set: String, rule_key: String },
    #[error("rule-set '{rule_set}' lists rule '{rule_key}' in more than one group")]
    DuplicateGroupMembership { rule_set: String, rule_key: String },
    #[error("rule '{rule_key}' reported score {score} above its maximum {max_score}")]
    ScoreAboveMaximum {
        rule_key: String,
        score: u32,
        max_score: u32,
    },
}

/// Lookup table mapping rule keys to their definitions; the single source of
/// truth for what a key means and its maximum score. Built once at startup
/// and read-only afterwards.
#[derive(Default)]
pub struct RuleRegistry {
    rules: BTreeMap<&'static str, Arc<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from rules whose keys are known distinct (the
    /// compiled-in table). External additions go through [`register`].
    ///
    /// [`register`]: RuleRegistry::register
    pub(crate) fn from_rules(rules: Vec<Arc<dyn Rule>>) -> Self {
        let mut map = BTreeMap::new();
        for rule in rules {
            map.insert(rule.key(), rule);
        }
        Self { rules: map }
    }

    pub fn register(&mut self, rule: Arc<dyn Rule>) -> Result<(), ConfigurationError> {
        let key = rule.key();
        if self.rules.contains_key(key) {
            return Err(ConfigurationError::DuplicateRegistration {
                rule_key: key.to_string(),
            });
        }
        self.rules.insert(key, rule);
        Ok(())
    }

    pub fn resolve(&self, key: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.get(key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.values()
    }
}
