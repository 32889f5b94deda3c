//! Category rule-sets and the compiled-in catalog.
//!
//! Rule-sets are declared once at startup and never mutated. A rule key may
//! appear in at most one group per rule-set, but the same key legitimately
//! recurs across rule-sets of different categories; the orchestrator
//! deduplicates execution while groups keep their own subtotals.

use std::collections::BTreeMap;

use serde::Serialize;

use super::registry::{ConfigurationError, RuleRegistry};

/// Labeled, weighted bundle of rule keys used for presentation subtotals.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    pub key: &'static str,
    pub label: &'static str,
    /// Emphasis multiplier consumed by presentation layers. Raw sums stay
    /// additive; the engine never rescales scores by this weight.
    pub weight: f32,
    pub rule_keys: Vec<&'static str>,
    pub admin_description: Option<&'static str>,
    pub public_description: Option<&'static str>,
}

/// Every rule group applicable to one entity category.
#[derive(Debug, Clone)]
pub struct CategoryRuleSet {
    pub category: &'static str,
    pub groups: Vec<RuleGroup>,
}

/// Mapping from category to its rule-set. Categories without an entry are
/// legal and contribute nothing to an evaluation.
pub struct RuleSetCatalog {
    rule_sets: BTreeMap<&'static str, CategoryRuleSet>,
}

impl RuleSetCatalog {
    pub fn new(rule_sets: Vec<CategoryRuleSet>) -> Self {
        let mut map = BTreeMap::new();
        for rule_set in rule_sets {
            map.insert(rule_set.category, rule_set);
        }
        Self { rule_sets: map }
    }

    /// The compiled-in rule-sets for the shipped directory categories.
    pub fn standard() -> Self {
        Self::new(standard_rule_sets())
    }

    pub fn rule_set_for(&self, category: &str) -> Option<&CategoryRuleSet> {
        self.rule_sets.get(category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rule_sets.keys().copied()
    }

    /// Startup validation pass: every referenced key must resolve in the
    /// registry and appear at most once per rule-set. Runs when the
    /// orchestrator is constructed so configuration defects fail deployment
    /// rather than individual evaluations.
    pub fn validate(&self, registry: &RuleRegistry) -> Result<(), ConfigurationError> {
        for rule_set in self.rule_sets.values() {
            let mut seen: Vec<&'static str> = Vec::new();
            for group in &rule_set.groups {
                for rule_key in &group.rule_keys {
                    if registry.resolve(rule_key).is_none() {
                        return Err(ConfigurationError::UnknownRule {
                            rule_set: rule_set.category.to_string(),
                            rule_key: rule_key.to_string(),
                        });
                    }
                    if seen.contains(rule_key) {
                        return Err(ConfigurationError::DuplicateGroupMembership {
                            rule_set: rule_set.category.to_string(),
                            rule_key: rule_key.to_string(),
                        });
                    }
                    seen.push(rule_key);
                }
            }
        }
        Ok(())
    }
}

impl CategoryRuleSet {
    /// Read-only metadata view joined against the registry, for consumers
    /// rendering labels, weights, and remediation guidance.
    pub fn view(&self, registry: &RuleRegistry) -> RuleSetView {
        RuleSetView {
            category: self.category,
            groups: self
                .groups
                .iter()
                .map(|group| GroupView {
                    key: group.key,
                    label: group.label,
                    weight: group.weight,
                    admin_description: group.admin_description,
                    public_description: group.public_description,
                    rules: group
                        .rule_keys
                        .iter()
                        .filter_map(|rule_key| registry.resolve(rule_key))
                        .map(|rule| RuleView {
                            key: rule.key(),
                            label: rule.label(),
                            max_score: rule.max_score(),
                            remediation: rule.remediation(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Serializable rule-set metadata for dashboards and profile pages.
#[derive(Debug, Clone, Serialize)]
pub struct RuleSetView {
    pub category: &'static str,
    pub groups: Vec<GroupView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub key: &'static str,
    pub label: &'static str,
    pub weight: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_description: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_description: Option<&'static str>,
    pub rules: Vec<RuleView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleView {
    pub key: &'static str,
    pub label: &'static str,
    pub max_score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<&'static str>,
}

fn standard_rule_sets() -> Vec<CategoryRuleSet> {
    vec![
        CategoryRuleSet {
            category: "private-school",
            groups: vec![
                RuleGroup {
                    key: "trust",
                    label: "Trust signals",
                    weight: 1.5,
                    rule_keys: vec![
                        "verified",
                        "google_business_profile",
                        "website_domain",
                        "social_links",
                    ],
                    admin_description: Some(
                        "Verification and external presence families check before a first visit.",
                    ),
                    public_description: Some("How easily families can confirm the school is real."),
                },
                RuleGroup {
                    key: "communication",
                    label: "Communication channels",
                    weight: 1.0,
                    rule_keys: vec!["phone", "email", "whatsapp"],
                    admin_description: Some(
                        "Every published channel shortens time-to-first-response.",
                    ),
                    public_description: Some("Ways to reach the admissions team."),
                },
                RuleGroup {
                    key: "presence",
                    label: "Profile presence",
                    weight: 1.0,
                    rule_keys: vec!["logo", "cover_image", "gallery", "description"],
                    admin_description: Some("Imagery and copy shown on the public profile page."),
                    public_description: None,
                },
                RuleGroup {
                    key: "academics",
                    label: "Academic offering",
                    weight: 1.25,
                    rule_keys: vec![
                        "program_catalog",
                        "tuition_transparency",
                        "admissions_contact",
                        "enrollment_open",
                    ],
                    admin_description: Some(
                        "Program depth and pricing transparency drive enrollment inquiries.",
                    ),
                    public_description: Some("Published programs, tuition, and admissions access."),
                },
            ],
        },
        CategoryRuleSet {
            category: "language-institute",
            groups: vec![
                RuleGroup {
                    key: "trust",
                    label: "Trust signals",
                    weight: 1.5,
                    rule_keys: vec!["verified", "google_business_profile", "social_links"],
                    admin_description: Some(
                        "Institutes compete on credibility; verification carries the group.",
                    ),
                    public_description: None,
                },
                RuleGroup {
                    key: "communication",
                    label: "Communication channels",
                    weight: 1.0,
                    rule_keys: vec!["phone", "email", "whatsapp"],
                    admin_description: None,
                    public_description: Some("Ways to reach the enrollment team."),
                },
                RuleGroup {
                    key: "presence",
                    label: "Profile presence",
                    weight: 1.0,
                    rule_keys: vec!["logo", "description"],
                    admin_description: None,
                    public_description: None,
                },
                RuleGroup {
                    key: "courses",
                    label: "Course offering",
                    weight: 1.25,
                    rule_keys: vec!["program_catalog", "tuition_transparency", "enrollment_open"],
                    admin_description: Some("Course catalog depth and per-level pricing."),
                    public_description: None,
                },
            ],
        },
        CategoryRuleSet {
            category: "tutoring-center",
            groups: vec![
                RuleGroup {
                    key: "trust",
                    label: "Trust signals",
                    weight: 1.5,
                    rule_keys: vec!["verified", "website_domain"],
                    admin_description: None,
                    public_description: None,
                },
                RuleGroup {
                    key: "communication",
                    label: "Communication channels",
                    weight: 1.0,
                    rule_keys: vec!["phone", "whatsapp", "email"],
                    admin_description: Some(
                        "Tutoring leads expect same-day replies; WhatsApp ordering is deliberate.",
                    ),
                    public_description: None,
                },
                RuleGroup {
                    key: "offer",
                    label: "Published offer",
                    weight: 1.0,
                    rule_keys: vec!["program_catalog", "tuition_transparency"],
                    admin_description: None,
                    public_description: Some("Subjects offered and their published rates."),
                },
            ],
        },
    ]
}
