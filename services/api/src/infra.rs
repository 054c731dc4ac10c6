use hiring_engine::config::AppConfig;
use hiring_engine::workflows::hiring::applications::{
    FilesystemResumeStore, HiringWorkflowService, InMemoryApplicationRepository,
    InMemoryJobRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local records with resumes written to the configured upload directory.
pub(crate) type ServerWorkflowService = HiringWorkflowService<
    InMemoryApplicationRepository,
    InMemoryJobRepository,
    FilesystemResumeStore,
>;

pub(crate) fn build_workflow_service(config: &AppConfig) -> Arc<ServerWorkflowService> {
    Arc::new(HiringWorkflowService::new(
        Arc::new(InMemoryApplicationRepository::default()),
        Arc::new(InMemoryJobRepository::default()),
        Arc::new(FilesystemResumeStore::new(config.storage.resume_dir.clone())),
        config.screening.clone(),
    ))
}
