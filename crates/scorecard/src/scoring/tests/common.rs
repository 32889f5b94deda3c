use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::scoring::catalog::{CategoryRuleSet, RuleGroup, RuleSetCatalog};
use crate::scoring::domain::{
    AdmissionsContact, ContactChannels, MediaAssets, OrganizationProfile, ProfileId,
    ProgramListing, SocialLink, SocialNetwork, VerificationStatus, WebPresence,
};
use crate::scoring::orchestrator::ScoringOrchestrator;
use crate::scoring::registry::{Rule, RuleComputationError, RuleOutcome, RuleRegistry};
use crate::scoring::repository::{
    ProfileRecord, ProfileRepository, PromptError, PromptPublisher, RepositoryError, UpsellPrompt,
};
use crate::scoring::router::scoring_router;
use crate::scoring::rules::standard_registry;
use crate::scoring::service::{ProfileScoringService, UpsellPolicy};

pub(super) fn partial_profile() -> OrganizationProfile {
    OrganizationProfile {
        slug: "riverside-academy".to_string(),
        display_name: "Riverside Academy".to_string(),
        categories: vec!["private-school".to_string()],
        verification: VerificationStatus {
            verified: true,
            verified_on: NaiveDate::from_ymd_opt(2026, 3, 2),
        },
        contact: ContactChannels {
            phone: Some("+1 515 555 0101".to_string()),
            email: None,
            whatsapp: None,
        },
        web: WebPresence::default(),
        media: MediaAssets::default(),
        description: None,
        programs: Vec::new(),
        admissions: None,
    }
}

pub(super) fn complete_profile() -> OrganizationProfile {
    OrganizationProfile {
        slug: "hillcrest-international".to_string(),
        display_name: "Hillcrest International School".to_string(),
        categories: vec!["private-school".to_string()],
        verification: VerificationStatus {
            verified: true,
            verified_on: NaiveDate::from_ymd_opt(2026, 1, 15),
        },
        contact: ContactChannels {
            phone: Some("+1 515 555 0140".to_string()),
            email: Some("admissions@hillcrest.example".to_string()),
            whatsapp: Some("+1 515 555 0141".to_string()),
        },
        web: WebPresence {
            website_domain: Some("hillcrest.example".to_string()),
            google_business_profile: Some("https://maps.google.com/?cid=42".to_string()),
            social_links: vec![
                SocialLink {
                    network: SocialNetwork::Facebook,
                    url: "https://facebook.com/hillcrest".to_string(),
                },
                SocialLink {
                    network: SocialNetwork::Instagram,
                    url: "https://instagram.com/hillcrest".to_string(),
                },
            ],
        },
        media: MediaAssets {
            logo_key: Some("media/hillcrest/logo.png".to_string()),
            cover_key: Some("media/hillcrest/cover.jpg".to_string()),
            gallery: (1..=4).map(|n| format!("media/hillcrest/gallery-{n}.jpg")).collect(),
        },
        description: Some(
            "Hillcrest International School offers a bilingual curriculum from kindergarten \
             through grade twelve, with small class sizes, an IB diploma track, and a campus \
             shared with the city's performing arts center."
                .to_string(),
        ),
        programs: vec![
            ProgramListing {
                name: "Primary Years".to_string(),
                summary: Some("Grades K-5".to_string()),
                monthly_fee: Some(640),
                enrollment_open: true,
            },
            ProgramListing {
                name: "Middle Years".to_string(),
                summary: Some("Grades 6-10".to_string()),
                monthly_fee: Some(720),
                enrollment_open: true,
            },
            ProgramListing {
                name: "IB Diploma".to_string(),
                summary: Some("Grades 11-12".to_string()),
                monthly_fee: Some(890),
                enrollment_open: false,
            },
        ],
        admissions: Some(AdmissionsContact {
            name: "Dana Whitfield".to_string(),
            email: Some("dana@hillcrest.example".to_string()),
            phone: None,
        }),
    }
}

pub(super) fn weak_profile() -> OrganizationProfile {
    OrganizationProfile {
        slug: "corner-tutoring".to_string(),
        display_name: "Corner Tutoring".to_string(),
        categories: vec!["private-school".to_string()],
        verification: VerificationStatus::default(),
        contact: ContactChannels {
            phone: Some("+1 515 555 0188".to_string()),
            email: None,
            whatsapp: None,
        },
        web: WebPresence::default(),
        media: MediaAssets::default(),
        description: None,
        programs: Vec::new(),
        admissions: None,
    }
}

/// Two-category catalog matching the scenarios in the scoring properties:
/// `private-school` carries a trust/communication split and
/// `language-institute` shares the `verified` rule under its own trust
/// group.
pub(super) fn fixture_catalog() -> RuleSetCatalog {
    RuleSetCatalog::new(vec![
        CategoryRuleSet {
            category: "private-school",
            groups: vec![
                RuleGroup {
                    key: "trust",
                    label: "Trust signals",
                    weight: 1.5,
                    rule_keys: vec!["verified", "google_business_profile"],
                    admin_description: None,
                    public_description: None,
                },
                RuleGroup {
                    key: "communication",
                    label: "Communication channels",
                    weight: 1.0,
                    rule_keys: vec!["phone", "email"],
                    admin_description: None,
                    public_description: None,
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
                    rule_keys: vec!["verified"],
                    admin_description: None,
                    public_description: None,
                },
                RuleGroup {
                    key: "courses",
                    label: "Course offering",
                    weight: 1.0,
                    rule_keys: vec!["program_catalog"],
                    admin_description: None,
                    public_description: None,
                },
            ],
        },
    ])
}

pub(super) fn fixture_orchestrator() -> ScoringOrchestrator {
    ScoringOrchestrator::new(Arc::new(standard_registry()), Arc::new(fixture_catalog()))
        .expect("fixture catalog resolves against standard registry")
}

pub(super) fn standard_orchestrator() -> Arc<ScoringOrchestrator> {
    Arc::new(
        ScoringOrchestrator::new(
            Arc::new(standard_registry()),
            Arc::new(RuleSetCatalog::standard()),
        )
        .expect("standard catalog resolves against standard registry"),
    )
}

/// Rule that always errors, for failure-propagation tests.
pub(super) struct ExplodingRule;

#[async_trait]
impl Rule for ExplodingRule {
    fn key(&self) -> &'static str {
        "explodes"
    }

    fn label(&self) -> &'static str {
        "Exploding rule"
    }

    fn max_score(&self) -> u32 {
        5
    }

    async fn compute(
        &self,
        _profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        Err(RuleComputationError::new("fact store offline"))
    }
}

/// Rule that reports more points than it declared, for ceiling tests.
pub(super) struct OverflowingRule;

#[async_trait]
impl Rule for OverflowingRule {
    fn key(&self) -> &'static str {
        "overflows"
    }

    fn label(&self) -> &'static str {
        "Overflowing rule"
    }

    fn max_score(&self) -> u32 {
        5
    }

    async fn compute(
        &self,
        _profile: &OrganizationProfile,
    ) -> Result<RuleOutcome, RuleComputationError> {
        Ok(RuleOutcome::scored(9))
    }
}

pub(super) fn registry_with(extra: Vec<Arc<dyn Rule>>) -> RuleRegistry {
    let mut registry = standard_registry();
    for rule in extra {
        registry.register(rule).expect("extra rule key is unique");
    }
    registry
}

pub(super) fn single_group_catalog(
    category: &'static str,
    group: &'static str,
    rule_keys: Vec<&'static str>,
) -> RuleSetCatalog {
    RuleSetCatalog::new(vec![CategoryRuleSet {
        category,
        groups: vec![RuleGroup {
            key: group,
            label: "Fixture group",
            weight: 1.0,
            rule_keys,
            admin_description: None,
            public_description: None,
        }],
    }])
}

pub(super) fn build_service() -> (
    ProfileScoringService<MemoryRepository, MemoryPrompts>,
    Arc<MemoryRepository>,
    Arc<MemoryPrompts>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let prompts = Arc::new(MemoryPrompts::default());
    let service = ProfileScoringService::new(
        repository.clone(),
        prompts.clone(),
        standard_orchestrator(),
        UpsellPolicy {
            prompt_below_percent: 80,
        },
    );
    (service, repository, prompts)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ProfileId, ProfileRecord>>>,
}

impl ProfileRepository for MemoryRepository {
    fn insert(&self, record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.profile_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.profile_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ProfileRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.profile_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn unscored(&self, _limit: usize) -> Result<Vec<ProfileRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryPrompts {
    events: Arc<Mutex<Vec<UpsellPrompt>>>,
}

impl MemoryPrompts {
    pub(super) fn events(&self) -> Vec<UpsellPrompt> {
        self.events.lock().expect("prompt mutex poisoned").clone()
    }
}

impl PromptPublisher for MemoryPrompts {
    fn publish(&self, prompt: UpsellPrompt) -> Result<(), PromptError> {
        self.events
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl ProfileRepository for ConflictRepository {
    fn insert(&self, _record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: ProfileRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        Ok(None)
    }

    fn unscored(&self, _limit: usize) -> Result<Vec<ProfileRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ProfileRepository for UnavailableRepository {
    fn insert(&self, _record: ProfileRecord) -> Result<ProfileRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ProfileRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn unscored(&self, _limit: usize) -> Result<Vec<ProfileRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn scoring_router_with_service(
    service: ProfileScoringService<MemoryRepository, MemoryPrompts>,
) -> axum::Router {
    scoring_router(Arc::new(service))
}
