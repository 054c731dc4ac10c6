//! Application lifecycle: intake through screening, the status pipeline, deletion, and stats.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod stats;
pub mod storage;
pub mod transitions;

#[cfg(test)]
mod tests;

pub use domain::{
    Actor, ActorRole, Application, ApplicationFilter, ApplicationId, ApplicationStatus,
    CandidateId, ResumeHandle,
};
pub use repository::{
    ApplicationRepository, JobRepository, RepositoryError, ResumeStore, ResumeStoreError,
};
pub use router::application_router;
pub use service::{
    ApplicationServiceError, HiringWorkflowService, JobDeletion, SubmissionOutcome,
};
pub use stats::{JobStats, StatusCounts};
pub use storage::{
    FilesystemResumeStore, InMemoryApplicationRepository, InMemoryJobRepository,
    InMemoryResumeStore,
};
pub use transitions::InvalidTransition;
