use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredRepository, InMemoryCandidateDirectory};
use crate::routes::with_pipeline_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cv_pipeline::config::AppConfig;
use cv_pipeline::error::AppError;
use cv_pipeline::telemetry;
use cv_pipeline::workflows::pipeline::PipelineService;
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
    if let Some(store) = args.store.take() {
        config.storage.pipeline_store = Some(store);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(ConfiguredRepository::from_path(
        config.storage.pipeline_store.clone(),
    ));
    let store = repository.describe();
    let directory = Arc::new(InMemoryCandidateDirectory::default());
    let pipeline_service = Arc::new(PipelineService::open(repository, directory)?);

    let app = with_pipeline_routes(pipeline_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        environment = config.environment.label(),
        %addr,
        %store,
        "cv pipeline service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
