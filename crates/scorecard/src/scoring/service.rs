use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::domain::{OrganizationProfile, ProfileId, ProfileScoreStatus};
use super::orchestrator::{EvaluationError, ScoringOrchestrator};
use super::repository::{
    ProfileRecord, ProfileRepository, PromptError, PromptPublisher, RepositoryError, UpsellPrompt,
};
use super::summary::ScoreSummary;

/// Controls when a readiness prompt is published after scoring.
#[derive(Debug, Clone)]
pub struct UpsellPolicy {
    /// Completion percentages strictly below this publish a prompt.
    pub prompt_below_percent: u8,
}

impl Default for UpsellPolicy {
    fn default() -> Self {
        Self {
            prompt_below_percent: 80,
        }
    }
}

/// Service composing the snapshot store, prompt publisher, and scoring
/// orchestrator.
pub struct ProfileScoringService<R, P> {
    repository: Arc<R>,
    prompts: Arc<P>,
    orchestrator: Arc<ScoringOrchestrator>,
    policy: UpsellPolicy,
}

static PROFILE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_profile_id() -> ProfileId {
    let id = PROFILE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProfileId(format!("org-{id:06}"))
}

impl<R, P> ProfileScoringService<R, P>
where
    R: ProfileRepository + 'static,
    P: PromptPublisher + 'static,
{
    pub fn new(
        repository: Arc<R>,
        prompts: Arc<P>,
        orchestrator: Arc<ScoringOrchestrator>,
        policy: UpsellPolicy,
    ) -> Self {
        Self {
            repository,
            prompts,
            orchestrator,
            policy,
        }
    }

    pub fn orchestrator(&self) -> &ScoringOrchestrator {
        &self.orchestrator
    }

    /// Store a new snapshot, returning the repository-backed record.
    pub fn submit(
        &self,
        profile: OrganizationProfile,
    ) -> Result<ProfileRecord, ScoringServiceError> {
        if profile.slug.trim().is_empty() {
            return Err(ScoringServiceError::InvalidSnapshot(
                "profile slug must not be empty".to_string(),
            ));
        }
        if profile.display_name.trim().is_empty() {
            return Err(ScoringServiceError::InvalidSnapshot(
                "profile display name must not be empty".to_string(),
            ));
        }

        let record = ProfileRecord {
            profile_id: next_profile_id(),
            profile,
            status: ProfileScoreStatus::Submitted,
            summary: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Score a stored snapshot and persist the outcome. Publishes an upsell
    /// prompt when completion falls below the policy threshold.
    pub async fn evaluate(
        &self,
        profile_id: &ProfileId,
    ) -> Result<ScoreSummary, ScoringServiceError> {
        let mut record = self
            .repository
            .fetch(profile_id)?
            .ok_or(RepositoryError::NotFound)?;

        let summary = self.orchestrator.evaluate(&record.profile).await?;

        record.status = ProfileScoreStatus::Scored;
        record.summary = Some(summary.clone());
        self.repository.update(record)?;

        let percent = summary.completion_percent();
        info!(
            profile_id = %profile_id.0,
            total_score = summary.total_score,
            total_max_score = summary.total_max_score,
            percent,
            "profile scored"
        );

        if percent < self.policy.prompt_below_percent {
            let mut details = BTreeMap::new();
            details.insert("completion_percent".to_string(), percent.to_string());
            details.insert(
                "open_gaps".to_string(),
                summary.gaps().count().to_string(),
            );
            self.prompts.publish(UpsellPrompt {
                template: "readiness_gaps".to_string(),
                profile_id: profile_id.clone(),
                details,
            })?;
        }

        Ok(summary)
    }

    /// Fetch a stored record and current status for API responses.
    pub fn get(&self, profile_id: &ProfileId) -> Result<ProfileRecord, ScoringServiceError> {
        let record = self
            .repository
            .fetch(profile_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error("invalid profile snapshot: {0}")]
    InvalidSnapshot(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
