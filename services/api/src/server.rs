use crate::cli::ServeArgs;
use crate::infra::{
    default_upsell_policy, standard_orchestrator, AppState, InMemoryProfileRepository,
    InMemoryPromptPublisher,
};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use scorecard::config::AppConfig;
use scorecard::error::AppError;
use scorecard::scoring::ProfileScoringService;
use scorecard::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryProfileRepository::default());
    let prompts = Arc::new(InMemoryPromptPublisher::default());
    let orchestrator = Arc::new(standard_orchestrator()?);
    let scoring_service = Arc::new(ProfileScoringService::new(
        repository,
        prompts,
        orchestrator,
        default_upsell_policy(),
    ));

    let app = with_scoring_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "profile scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
