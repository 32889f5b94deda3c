use metrics_exporter_prometheus::PrometheusHandle;
use scorecard::scoring::catalog::RuleSetCatalog;
use scorecard::scoring::registry::ConfigurationError;
use scorecard::scoring::rules::standard_registry;
use scorecard::scoring::{
    ProfileId, ProfileRecord, ProfileRepository, ProfileScoreStatus, PromptError, PromptPublisher,
    RepositoryError, ScoringOrchestrator, UpsellPolicy, UpsellPrompt,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    records: Arc<Mutex<HashMap<ProfileId, ProfileRecord>>>,
}

impl ProfileRepository for InMemoryProfileRepository {
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
        if guard.contains_key(&record.profile_id) {
            guard.insert(record.profile_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn unscored(&self, _limit: usize) -> Result<Vec<ProfileRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.status == ProfileScoreStatus::Submitted)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPromptPublisher {
    events: Arc<Mutex<Vec<UpsellPrompt>>>,
}

impl PromptPublisher for InMemoryPromptPublisher {
    fn publish(&self, prompt: UpsellPrompt) -> Result<(), PromptError> {
        let mut guard = self.events.lock().expect("prompt mutex poisoned");
        guard.push(prompt);
        Ok(())
    }
}

impl InMemoryPromptPublisher {
    pub(crate) fn events(&self) -> Vec<UpsellPrompt> {
        self.events.lock().expect("prompt mutex poisoned").clone()
    }
}

/// Composes the compiled-in registry and catalog into a validated
/// orchestrator.
pub(crate) fn standard_orchestrator() -> Result<ScoringOrchestrator, ConfigurationError> {
    ScoringOrchestrator::new(
        Arc::new(standard_registry()),
        Arc::new(RuleSetCatalog::standard()),
    )
}

pub(crate) fn default_upsell_policy() -> UpsellPolicy {
    UpsellPolicy {
        prompt_below_percent: 80,
    }
}
