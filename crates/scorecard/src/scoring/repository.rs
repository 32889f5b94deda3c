use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{OrganizationProfile, ProfileId, ProfileScoreStatus};
use super::summary::ScoreSummary;

/// Stored snapshot plus its scoring state and latest summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub profile_id: ProfileId,
    pub profile: OrganizationProfile,
    pub status: ProfileScoreStatus,
    pub summary: Option<ScoreSummary>,
}

impl ProfileRecord {
    pub fn readiness_rationale(&self) -> String {
        match &self.summary {
            Some(summary) => format!(
                "scored {} of {} ({}% ready)",
                summary.total_score,
                summary.total_max_score,
                summary.completion_percent()
            ),
            None => "not yet scored".to_string(),
        }
    }

    pub fn status_view(&self) -> ProfileStatusView {
        ProfileStatusView {
            profile_id: self.profile_id.clone(),
            slug: self.profile.slug.clone(),
            status: self.status.label(),
            readiness_rationale: self.readiness_rationale(),
            completion_percent: self
                .summary
                .as_ref()
                .map(ScoreSummary::completion_percent),
            total_score: self.summary.as_ref().map(|summary| summary.total_score),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait ProfileRepository: Send + Sync {
    fn insert(&self, record: ProfileRecord) -> Result<ProfileRecord, RepositoryError>;
    fn update(&self, record: ProfileRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError>;
    fn unscored(&self, limit: usize) -> Result<Vec<ProfileRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for upsell/readiness prompts raised after scoring.
pub trait PromptPublisher: Send + Sync {
    fn publish(&self, prompt: UpsellPrompt) -> Result<(), PromptError>;
}

/// Payload handed to the prompt transport (in-app nudge, e-mail digest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsellPrompt {
    pub template: String,
    pub profile_id: ProfileId,
    pub details: BTreeMap<String, String>,
}

/// Prompt dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("prompt transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a profile's exposed scoring status.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileStatusView {
    pub profile_id: ProfileId,
    pub slug: String,
    pub status: &'static str,
    pub readiness_rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_score: Option<u32>,
}
