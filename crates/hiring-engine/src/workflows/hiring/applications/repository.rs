use super::domain::{
    Application, ApplicationFilter, ApplicationId, ApplicationStatus, ResumeHandle,
};
use crate::workflows::hiring::jobs::{JobId, JobRequirement};
use crate::workflows::hiring::screening::ResumeDocument;

/// Application storage. Implementations must make `insert` atomic with respect to the
/// (candidate, job) pair and `compare_and_set_status` atomic with respect to the status.
pub trait ApplicationRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the candidate already applied to the job.
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    /// Writes `next` only while the stored status still equals `expected`.
    fn compare_and_set_status(
        &self,
        id: &ApplicationId,
        expected: ApplicationStatus,
        next: ApplicationStatus,
    ) -> Result<Application, RepositoryError>;
    /// Returns the removed record, or `None` when nothing was stored under `id`.
    fn delete(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn list(&self, filter: &ApplicationFilter) -> Result<Vec<Application>, RepositoryError>;
}

/// Job lookup owned by the surrounding portal.
pub trait JobRepository: Send + Sync {
    fn insert(&self, job: JobRequirement) -> Result<JobRequirement, RepositoryError>;
    fn fetch(&self, id: &JobId) -> Result<Option<JobRequirement>, RepositoryError>;
    /// Returns whether a record was removed.
    fn delete(&self, id: &JobId) -> Result<bool, RepositoryError>;
    fn list(&self) -> Result<Vec<JobRequirement>, RepositoryError>;
}

/// File store holding the uploaded resumes.
pub trait ResumeStore: Send + Sync {
    fn store(&self, document: &ResumeDocument) -> Result<ResumeHandle, ResumeStoreError>;
    /// Releasing a handle whose file is already gone succeeds.
    fn release(&self, handle: &ResumeHandle) -> Result<(), ResumeStoreError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("status changed concurrently (now {current})")]
    StatusMismatch { current: ApplicationStatus },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ResumeStoreError {
    #[error("invalid resume handle '{0}'")]
    InvalidHandle(String),
    #[error("resume storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("resume storage unavailable: {0}")]
    Unavailable(String),
}
