use crate::demo::sample_profile;
use crate::infra::{standard_orchestrator, AppState};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use scorecard::error::AppError;
use scorecard::scoring::{
    scoring_router, OrganizationProfile, ProfileRepository, ProfileScoringService, PromptPublisher,
    ScoreSummary, SnapshotImporter,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ScorePreviewRequest {
    /// Inline snapshot to score. Falls back to the pasted CSV export, then
    /// to the built-in sample profile.
    #[serde(default)]
    pub(crate) profile: Option<OrganizationProfile>,
    #[serde(default)]
    pub(crate) snapshot_csv: Option<String>,
    /// Selects one organization from the CSV export; defaults to the first.
    #[serde(default)]
    pub(crate) slug: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScorePreviewResponse {
    pub(crate) slug: String,
    pub(crate) data_source: PreviewDataSource,
    pub(crate) completion_percent: u8,
    pub(crate) summary: ScoreSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum PreviewDataSource {
    Inline,
    Csv,
    Sample,
}

pub(crate) fn with_scoring_routes<R, P>(
    service: Arc<ProfileScoringService<R, P>>,
) -> axum::Router
where
    R: ProfileRepository + 'static,
    P: PromptPublisher + 'static,
{
    scoring_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/score/preview",
            axum::routing::post(score_preview_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Stateless scoring: nothing is stored and no prompts are published, so
/// dashboards can re-score edits before saving them.
pub(crate) async fn score_preview_endpoint(
    Json(payload): Json<ScorePreviewRequest>,
) -> Response {
    let ScorePreviewRequest {
        profile,
        snapshot_csv,
        slug,
    } = payload;

    let (profile, data_source) = if let Some(profile) = profile {
        (profile, PreviewDataSource::Inline)
    } else if let Some(csv) = snapshot_csv {
        let profiles = match SnapshotImporter::from_reader(csv.as_bytes()) {
            Ok(profiles) => profiles,
            Err(err) => return AppError::from(err).into_response(),
        };
        let selected = match &slug {
            Some(slug) => profiles.into_iter().find(|profile| &profile.slug == slug),
            None => profiles.into_iter().next(),
        };
        match selected {
            Some(profile) => (profile, PreviewDataSource::Csv),
            None => {
                let payload = json!({
                    "error": "no matching organization in export",
                    "slug": slug,
                });
                return (StatusCode::NOT_FOUND, Json(payload)).into_response();
            }
        }
    } else {
        (sample_profile(), PreviewDataSource::Sample)
    };

    let orchestrator = match standard_orchestrator() {
        Ok(orchestrator) => orchestrator,
        Err(err) => return AppError::from(err).into_response(),
    };

    match orchestrator.evaluate(&profile).await {
        Ok(summary) => {
            let response = ScorePreviewResponse {
                slug: profile.slug,
                data_source,
                completion_percent: summary.completion_percent(),
                summary,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => AppError::from(err).into_response(),
    }
}
