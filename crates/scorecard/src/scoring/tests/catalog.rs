use super::common::*;
use crate::scoring::catalog::{CategoryRuleSet, RuleGroup, RuleSetCatalog};
use crate::scoring::registry::ConfigurationError;
use crate::scoring::rules::standard_registry;

#[test]
fn standard_catalog_validates_against_standard_registry() {
    let registry = standard_registry();
    let catalog = RuleSetCatalog::standard();

    catalog
        .validate(&registry)
        .expect("shipped configuration is internally consistent");

    let categories: Vec<&str> = catalog.categories().collect();
    assert_eq!(
        categories,
        vec!["language-institute", "private-school", "tutoring-center"]
    );
}

#[test]
fn unknown_categories_have_no_rule_set() {
    let catalog = RuleSetCatalog::standard();
    assert!(catalog.rule_set_for("food-truck").is_none());
    assert!(catalog.rule_set_for("private-school").is_some());
}

#[test]
fn validation_rejects_unknown_rule_keys() {
    let registry = standard_registry();
    let catalog = single_group_catalog("private-school", "trust", vec!["verified", "ghost_rule"]);

    let err = catalog
        .validate(&registry)
        .expect_err("unknown rule key rejected");
    match err {
        ConfigurationError::UnknownRule { rule_set, rule_key } => {
            assert_eq!(rule_set, "private-school");
            assert_eq!(rule_key, "ghost_rule");
        }
        other => panic!("expected unknown rule error, got {other:?}"),
    }
}

#[test]
fn validation_rejects_a_rule_listed_in_two_groups_of_one_rule_set() {
    let registry = standard_registry();
    let catalog = RuleSetCatalog::new(vec![CategoryRuleSet {
        category: "private-school",
        groups: vec![
            RuleGroup {
                key: "trust",
                label: "Trust signals",
                weight: 1.0,
                rule_keys: vec!["verified"],
                admin_description: None,
                public_description: None,
            },
            RuleGroup {
                key: "communication",
                label: "Communication channels",
                weight: 1.0,
                rule_keys: vec!["phone", "verified"],
                admin_description: None,
                public_description: None,
            },
        ],
    }]);

    let err = catalog
        .validate(&registry)
        .expect_err("intra-rule-set duplicate rejected");
    match err {
        ConfigurationError::DuplicateGroupMembership { rule_set, rule_key } => {
            assert_eq!(rule_set, "private-school");
            assert_eq!(rule_key, "verified");
        }
        other => panic!("expected duplicate membership error, got {other:?}"),
    }
}

#[test]
fn views_join_group_declarations_with_registry_metadata() {
    let registry = standard_registry();
    let catalog = RuleSetCatalog::standard();
    let rule_set = catalog
        .rule_set_for("private-school")
        .expect("private-school is shipped");

    let view = rule_set.view(&registry);

    assert_eq!(view.category, "private-school");
    let trust = view
        .groups
        .iter()
        .find(|group| group.key == "trust")
        .expect("trust group present");
    assert_eq!(trust.label, "Trust signals");
    assert!(trust.weight > 1.0);

    let verified = trust
        .rules
        .iter()
        .find(|rule| rule.key == "verified")
        .expect("verified rule present");
    assert_eq!(verified.max_score, 10);
    assert!(verified.remediation.is_some());
}
