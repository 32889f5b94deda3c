//! Rule-based scoring engine: registry, category rule-sets, orchestrator,
//! and the service/HTTP surface around them.
//!
//! The engine deduplicates rule execution across overlapping category
//! rule-sets (every distinct rule computes exactly once per evaluation)
//! while group subtotals remain additive views over the shared results.

pub mod catalog;
pub mod domain;
pub mod import;
pub mod orchestrator;
pub mod registry;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;
pub mod summary;

#[cfg(test)]
mod tests;

pub use catalog::{CategoryRuleSet, GroupView, RuleGroup, RuleSetCatalog, RuleSetView, RuleView};
pub use domain::{
    AdmissionsContact, ContactChannels, MediaAssets, OrganizationProfile, ProfileId,
    ProfileScoreStatus, ProgramListing, SocialLink, SocialNetwork, VerificationStatus, WebPresence,
};
pub use import::{SnapshotImportError, SnapshotImporter};
pub use orchestrator::{EvaluationError, ScoringOrchestrator};
pub use registry::{ConfigurationError, Rule, RuleComputationError, RuleOutcome, RuleRegistry};
pub use repository::{
    ProfileRecord, ProfileRepository, ProfileStatusView, PromptError, PromptPublisher,
    RepositoryError, UpsellPrompt,
};
pub use router::scoring_router;
pub use rules::standard_registry;
pub use service::{ProfileScoringService, ScoringServiceError, UpsellPolicy};
pub use summary::{GroupScore, ScoreSummary, ScoredRule};
