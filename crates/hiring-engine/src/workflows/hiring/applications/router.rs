use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::{Actor, ApplicationId, ApplicationStatus, CandidateId};
use super::repository::{ApplicationRepository, JobRepository, RepositoryError, ResumeStore};
use super::service::{ApplicationServiceError, HiringWorkflowService};
use crate::workflows::hiring::jobs::{JobId, NewJob};
use crate::workflows::hiring::screening::{DocumentError, ResumeDocument};

/// Room for multipart boundaries and the text fields around the resume itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Router builder exposing the application and job endpoints.
pub fn application_router<A, J, S>(service: Arc<HiringWorkflowService<A, J, S>>) -> Router
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    S: ResumeStore + 'static,
{
    let body_limit = service
        .config()
        .max_resume_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route(
            "/api/v1/applications",
            post(submit_handler::<A, J, S>).get(list_handler::<A, J, S>),
        )
        .route("/api/v1/applications/stats", get(stats_handler::<A, J, S>))
        .route(
            "/api/v1/applications/:application_id",
            get(get_handler::<A, J, S>).delete(delete_application_handler::<A, J, S>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            patch(transition_handler::<A, J, S>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/applications",
            get(candidate_handler::<A, J, S>),
        )
        .route(
            "/api/v1/jobs",
            post(register_job_handler::<A, J, S>).get(open_jobs_handler::<A, J, S>),
        )
        .route("/api/v1/jobs/stats", get(job_stats_handler::<A, J, S>))
        .route("/api/v1/jobs/:job_id", delete(delete_job_handler::<A, J, S>))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(service)
}

type SharedService<A, J, S> = State<Arc<HiringWorkflowService<A, J, S>>>;

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    job_id: Option<JobId>,
}

/// The acting user is never read from the body; an upstream auth layer inserts it as a
/// request extension.
#[derive(Debug, Deserialize)]
pub(crate) struct TransitionRequest {
    status: ApplicationStatus,
}

struct SubmissionForm {
    candidate_id: CandidateId,
    job_id: JobId,
    document: ResumeDocument,
}

pub(crate) async fn submit_handler<A, J, S>(
    State(service): SharedService<A, J, S>,
    mut multipart: Multipart,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    S: ResumeStore + 'static,
{
    let form = match read_submission_form(&mut multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    // Extraction and the resume write are blocking work.
    let submitted = tokio::task::spawn_blocking(move || {
        service.submit(form.candidate_id, &form.job_id, form.document)
    })
    .await;

    match submitted {
        Ok(Ok(outcome)) => {
            let status = if outcome.is_admitted() {
                StatusCode::CREATED
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, Json(outcome)).into_response()
        }
        Ok(Err(err)) => err.into_response(),
        Err(err) => {
            warn!(error = %err, "submission task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "submission could not be processed" })),
            )
                .into_response()
        }
    }
}

async fn read_submission_form(multipart: &mut Multipart) -> Result<SubmissionForm, Response> {
    let mut candidate_id: Option<String> = None;
    let mut job_id: Option<String> = None;
    let mut document: Option<ResumeDocument> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| multipart_rejection("invalid multipart data", err))?
    {
        let name = field.name().map(|n| n.to_string());
        match name.as_deref() {
            Some("resume") => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let content_type = field.content_type().map(|mime| mime.to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|err| multipart_rejection("failed to read resume bytes", err))?;
                document = Some(ResumeDocument::new(file_name, content_type, data.to_vec()));
            }
            Some("candidate_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| multipart_rejection("invalid candidate_id", err))?;
                candidate_id = Some(value.trim().to_string());
            }
            Some("job_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| multipart_rejection("invalid job_id", err))?;
                job_id = Some(value.trim().to_string());
            }
            _ => {}
        }
    }

    let candidate_id = candidate_id
        .filter(|value| !value.is_empty())
        .ok_or_else(|| bad_request("candidate_id field is required"))?;
    let job_id = job_id
        .filter(|value| !value.is_empty())
        .ok_or_else(|| bad_request("job_id field is required"))?;
    let document = document.ok_or_else(|| bad_request("resume file is required"))?;

    Ok(SubmissionForm {
        candidate_id: CandidateId(candidate_id),
        job_id: JobId(job_id),
        document,
    })
}

pub(crate) async fn list_handler<A, J, S>(
    State(service): SharedService<A, J, S>,
    Query(query): Query<ListQuery>,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    S: ResumeStore + 'static,
{
    match service.applications(query.job_id) {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn get_handler<A, J, S>(
    State(service): SharedService<A, J, S>,
    Path(application_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    S: ResumeStore + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn transition_handler<A, J, S>(
    State(service): SharedService<A, J, S>,
    Path(application_id): Path<String>,
    actor: Option<Extension<Actor>>,
    Json(request): Json<TransitionRequest>,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    S: ResumeStore + 'static,
{
    let Some(Extension(actor)) = actor else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "authenticated actor is required" })),
        )
            .into_response();
    };

    let id = ApplicationId(application_id);
    match service.transition_status(&id, request.status, &actor) {
        Ok(application) => (
            StatusCode::OK,
            Json(json!({
                "message": format!("Application status updated to {}", application.status),
                "application": application,
            })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_application_handler<A, J, S>(
    State(service): SharedService<A, J, S>,
    Path(application_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    S: ResumeStore + 'static,
{
    match service.delete_application(&ApplicationId(application_id)) {
        Ok(application) => (
            StatusCode::OK,
            Json(json!({
                "message": "Application deleted successfully",
                "application_id": application.id,
            })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn candidate_handler<A, J, S>(
    State(service): SharedService<A, J, S>,
    Path(candidate_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    S: ResumeStore + 'static,
{
    match service.candidate_applications(&CandidateId(candidate_id)) {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn stats_handler<A, J, S>(State(service): SharedService<A, J, S>) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    S: ResumeStore + 'static,
{
    match service.stats() {
        Ok(counts) => (StatusCode::OK, Json(counts)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn register_job_handler<A, J, S>(
    State(service): SharedService<A, J, S>,
    Json(job): Json<NewJob>,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    S: ResumeStore + 'static,
{
    match service.register_job(job) {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn open_jobs_handler<A, J, S>(State(service): SharedService<A, J, S>) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    S: ResumeStore + 'static,
{
    match service.open_jobs() {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn job_stats_handler<A, J, S>(State(service): SharedService<A, J, S>) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    S: ResumeStore + 'static,
{
    match service.job_stats() {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_job_handler<A, J, S>(
    State(service): SharedService<A, J, S>,
    Path(job_id): Path<String>,
) -> Response
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    S: ResumeStore + 'static,
{
    match service.delete_job(&JobId(job_id)) {
        Ok(deletion) => (
            StatusCode::OK,
            Json(json!({
                "message": "Job deleted successfully",
                "job_id": deletion.job.id,
                "deleted_applications": deletion.deleted_applications,
            })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

impl ApplicationServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::JobNotFound(_) | Self::ApplicationNotFound(_) => StatusCode::NOT_FOUND,
            Self::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::DuplicateApplication { .. } | Self::JobClosed(_) => StatusCode::CONFLICT,
            Self::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            Self::InvalidTransition(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized { .. } => StatusCode::FORBIDDEN,
            Self::InvalidJob(_) => StatusCode::BAD_REQUEST,
            Self::Document(DocumentError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Document(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Repository(_) | Self::ResumeStore(_) | Self::CascadeInterrupted { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApplicationServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(error = %self, "hiring workflow request failed");
        }

        let payload = match &self {
            Self::InvalidTransition(err) => json!({
                "error": self.to_string(),
                "current": err.current,
                "requested": err.requested,
            }),
            Self::CascadeInterrupted { deleted, .. } => json!({
                "error": self.to_string(),
                "deleted_applications": deleted,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(payload)).into_response()
    }
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn multipart_rejection(context: &str, err: MultipartError) -> Response {
    warn!(error = %err, "{context}");
    let status = err.status();
    (status, Json(json!({ "error": format!("{context}: {err}") }))).into_response()
}
