use crate::cli::ServeArgs;
use crate::infra::{build_workflow_service, AppState};
use crate::routes::with_application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hiring_engine::config::AppConfig;
use hiring_engine::error::AppError;
use hiring_engine::telemetry;
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
    if let Some(resume_dir) = args.resume_dir.take() {
        config.storage.resume_dir = resume_dir;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    std::fs::create_dir_all(&config.storage.resume_dir)?;
    let workflow_service = build_workflow_service(&config);

    let app = with_application_routes(workflow_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        resume_dir = %config.storage.resume_dir.display(),
        minimum_skill_match = config.screening.minimum_skill_match,
        "hiring engine ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
