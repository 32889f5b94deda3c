use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{OrganizationProfile, ProfileId, ProfileScoreStatus};
use super::repository::{ProfileRepository, PromptPublisher, RepositoryError};
use super::service::{ProfileScoringService, ScoringServiceError};

/// Router builder exposing HTTP endpoints for snapshot intake, scoring, and
/// rule-set metadata.
pub fn scoring_router<R, P>(service: Arc<ProfileScoringService<R, P>>) -> Router
where
    R: ProfileRepository + 'static,
    P: PromptPublisher + 'static,
{
    Router::new()
        .route("/api/v1/profiles", post(submit_handler::<R, P>))
        .route(
            "/api/v1/profiles/:profile_id",
            get(status_handler::<R, P>),
        )
        .route(
            "/api/v1/profiles/:profile_id/score",
            post(score_handler::<R, P>),
        )
        .route("/api/v1/rulesets/:category", get(ruleset_handler::<R, P>))
        .with_state(service)
}

pub(crate) async fn submit_handler<R, P>(
    State(service): State<Arc<ProfileScoringService<R, P>>>,
    axum::Json(profile): axum::Json<OrganizationProfile>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: PromptPublisher + 'static,
{
    match service.submit(profile) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::ACCEPTED, axum::Json(view)).into_response()
        }
        Err(ScoringServiceError::InvalidSnapshot(reason)) => {
            let payload = json!({
                "error": reason,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ScoringServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "profile already exists",
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn score_handler<R, P>(
    State(service): State<Arc<ProfileScoringService<R, P>>>,
    Path(profile_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: PromptPublisher + 'static,
{
    let id = ProfileId(profile_id);
    match service.evaluate(&id).await {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(ScoringServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "profile not found",
                "profile_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R, P>(
    State(service): State<Arc<ProfileScoringService<R, P>>>,
    Path(profile_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: PromptPublisher + 'static,
{
    let id = ProfileId(profile_id);
    match service.get(&id) {
        Ok(record) => {
            let view = record.status_view();
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(ScoringServiceError::Repository(RepositoryError::NotFound)) => {
            // Unknown ids render the same "not yet scored" shape consumers
            // already handle, instead of an error page.
            let payload = json!({
                "profile_id": id.0,
                "status": ProfileScoreStatus::Submitted.label(),
                "readiness_rationale": "not yet scored",
                "total_score": serde_json::Value::Null,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn ruleset_handler<R, P>(
    State(service): State<Arc<ProfileScoringService<R, P>>>,
    Path(category): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: PromptPublisher + 'static,
{
    match service.orchestrator().ruleset_view(&category) {
        Some(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        None => {
            let payload = json!({
                "error": "no rule-set registered for category",
                "category": category,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}
