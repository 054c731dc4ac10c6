use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use serde_json::Value;

use crate::workflows::hiring::applications::{
    application_router, Actor, Application, ApplicationFilter, ApplicationId, ApplicationRepository,
    ApplicationStatus, HiringWorkflowService, InMemoryApplicationRepository,
    InMemoryJobRepository, InMemoryResumeStore, RepositoryError,
};
use crate::workflows::hiring::jobs::{JobRequirement, JobType, NewJob};
use crate::workflows::hiring::screening::{ResumeDocument, ScreeningConfig};

pub(super) const EMPLOYER: &str = "employer-7";
pub(super) const BOUNDARY: &str = "hiring-engine-boundary";

pub(super) struct Harness<A = InMemoryApplicationRepository> {
    pub(super) service: HiringWorkflowService<A, InMemoryJobRepository, InMemoryResumeStore>,
    pub(super) applications: Arc<A>,
    pub(super) jobs: Arc<InMemoryJobRepository>,
    pub(super) resumes: Arc<InMemoryResumeStore>,
}

pub(super) fn build_service() -> Harness {
    build_service_with(InMemoryApplicationRepository::default())
}

pub(super) fn build_service_with<A>(repository: A) -> Harness<A>
where
    A: ApplicationRepository + 'static,
{
    let applications = Arc::new(repository);
    let jobs = Arc::new(InMemoryJobRepository::default());
    let resumes = Arc::new(InMemoryResumeStore::default());
    let service = HiringWorkflowService::new(
        applications.clone(),
        jobs.clone(),
        resumes.clone(),
        ScreeningConfig::default(),
    );
    Harness {
        service,
        applications,
        jobs,
        resumes,
    }
}

pub(super) fn backend_job() -> NewJob {
    NewJob {
        title: "Backend Engineer".to_string(),
        job_type: JobType::FullTime,
        required_skills: vec!["Rust".to_string(), "SQL".to_string()],
        required_experience_months: 3,
        posted_by: Some(EMPLOYER.to_string()),
    }
}

pub(super) fn resume(text: &str) -> ResumeDocument {
    ResumeDocument::plain_text("cv.txt", text)
}

/// Matches every skill of [`backend_job`] and clears its experience bar.
pub(super) fn strong_resume() -> ResumeDocument {
    resume("Rust and SQL engineer with 5 years in production")
}

pub(super) fn post_job<A>(harness: &Harness<A>) -> JobRequirement
where
    A: ApplicationRepository + 'static,
{
    harness
        .service
        .register_job(backend_job())
        .expect("job registered")
}

pub(super) fn admit<A>(harness: &Harness<A>, job: &JobRequirement, candidate: &str) -> Application
where
    A: ApplicationRepository + 'static,
{
    harness
        .service
        .submit(candidate.into(), &job.id, strong_resume())
        .expect("submission accepted")
        .application
        .expect("application created")
}

/// Lets a competing writer move the application first, once.
pub(super) struct RacingRepository {
    pub(super) inner: InMemoryApplicationRepository,
    pub(super) interloper: Mutex<Option<ApplicationStatus>>,
}

impl RacingRepository {
    pub(super) fn new(interloper: ApplicationStatus) -> Self {
        Self {
            inner: InMemoryApplicationRepository::default(),
            interloper: Mutex::new(Some(interloper)),
        }
    }
}

impl ApplicationRepository for RacingRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        self.inner.insert(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn compare_and_set_status(
        &self,
        id: &ApplicationId,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        let interloper = self.interloper.lock().expect("race mutex poisoned").take();
        if let Some(winner) = interloper {
            self.inner.compare_and_set_status(id, expected, winner)?;
        }
        self.inner.compare_and_set_status(id, expected, next)
    }

    fn delete(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.delete(id)
    }

    fn list(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, RepositoryError> {
        self.inner.list(filter)
    }
}

/// Deletes succeed a fixed number of times, then the store goes away.
pub(super) struct FlakyDeleteRepository {
    pub(super) inner: InMemoryApplicationRepository,
    pub(super) remaining: Mutex<usize>,
}

impl FlakyDeleteRepository {
    pub(super) fn new(successes: usize) -> Self {
        Self {
            inner: InMemoryApplicationRepository::default(),
            remaining: Mutex::new(successes),
        }
    }
}

impl ApplicationRepository for FlakyDeleteRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        self.inner.insert(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn compare_and_set_status(
        &self,
        id: &ApplicationId,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        self.inner.compare_and_set_status(id, expected, next)
    }

    fn delete(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let mut remaining = self.remaining.lock().expect("delete mutex poisoned");
        if *remaining == 0 {
            return Err(RepositoryError::Unavailable("database offline".to_string()));
        }
        *remaining -= 1;
        self.inner.delete(id)
    }

    fn list(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, RepositoryError> {
        self.inner.list(filter)
    }
}

/// Lists one extra record that is no longer stored, as if removed mid-cascade.
pub(super) struct StaleListingRepository {
    pub(super) inner: InMemoryApplicationRepository,
    pub(super) ghost: Mutex<Option<Application>>,
}

impl StaleListingRepository {
    pub(super) fn new() -> Self {
        Self {
            inner: InMemoryApplicationRepository::default(),
            ghost: Mutex::new(None),
        }
    }
}

impl ApplicationRepository for StaleListingRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        self.inner.insert(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn compare_and_set_status(
        &self,
        id: &ApplicationId,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        self.inner.compare_and_set_status(id, expected, next)
    }

    fn delete(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        self.inner.delete(id)
    }

    fn list(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, RepositoryError> {
        let mut listed = self.inner.list(filter)?;
        if let Some(ghost) = self.ghost.lock().expect("ghost mutex poisoned").clone() {
            if filter.matches(&ghost) {
                listed.push(ghost);
            }
        }
        Ok(listed)
    }
}

pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn compare_and_set_status(
        &self,
        _id: &ApplicationId,
        _expected: ApplicationStatus,
        _next: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self, _filter: &ApplicationFilter) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_for(harness: Harness) -> axum::Router {
    application_router(Arc::new(harness.service))
}

pub(super) fn multipart_submission(
    candidate_id: &str,
    job_id: &str,
    file_name: &str,
    content_type: &str,
    resume: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in [("candidate_id", candidate_id), ("job_id", job_id)] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(resume);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/v1/applications")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds")
}

pub(super) fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(payload).expect("payload serializes"),
        ))
        .expect("request builds")
}

/// Attaches the identity an auth layer would have resolved for the request.
pub(super) fn acting_as(mut request: Request<Body>, actor: Actor) -> Request<Body> {
    request.extensions_mut().insert(actor);
    request
}

pub(super) fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
