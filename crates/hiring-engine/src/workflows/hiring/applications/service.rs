use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{
    Actor, Application, ApplicationFilter, ApplicationId, ApplicationStatus, CandidateId,
    ResumeHandle,
};
use super::repository::{
    ApplicationRepository, JobRepository, RepositoryError, ResumeStore, ResumeStoreError,
};
use super::stats::{self, JobStats, StatusCounts};
use super::transitions::{self, InvalidTransition};
use crate::workflows::hiring::jobs::{JobId, JobRequirement, NewJob};
use crate::workflows::hiring::screening::{
    decide_admission, AdmissionDecision, DocumentError, DocumentTextExtractor, ResumeAnalyzer,
    ResumeDocument, ScreeningConfig, TextExtractor,
};

/// Service composing screening, the transition table, and the storage collaborators.
pub struct HiringWorkflowService<A, J, S> {
    applications: Arc<A>,
    jobs: Arc<J>,
    resumes: Arc<S>,
    extractor: Arc<dyn TextExtractor>,
    analyzer: ResumeAnalyzer,
    config: ScreeningConfig,
}

/// What the candidate is told after submitting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
    pub skill_match: u8,
    pub experience_match: bool,
    pub decision: AdmissionDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
    pub message: String,
}

impl SubmissionOutcome {
    pub fn is_admitted(&self) -> bool {
        self.application.is_some()
    }
}

/// Result of removing a job and its applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobDeletion {
    pub job: JobRequirement,
    pub deleted_applications: usize,
}

impl<A, J, S> HiringWorkflowService<A, J, S>
where
    A: ApplicationRepository + 'static,
    J: JobRepository + 'static,
    S: ResumeStore + 'static,
{
    pub fn new(
        applications: Arc<A>,
        jobs: Arc<J>,
        resumes: Arc<S>,
        config: ScreeningConfig,
    ) -> Self {
        let extractor = Arc::new(DocumentTextExtractor::new(config.max_resume_bytes));
        Self {
            applications,
            jobs,
            resumes,
            extractor,
            analyzer: ResumeAnalyzer::new(),
            config,
        }
    }

    /// Swap the text extraction collaborator (e.g. an OCR-backed extractor).
    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn config(&self) -> &ScreeningConfig {
        &self.config
    }

    pub fn register_job(&self, job: NewJob) -> Result<JobRequirement, ApplicationServiceError> {
        if job.title.trim().is_empty() {
            return Err(ApplicationServiceError::InvalidJob(
                "title is required".to_string(),
            ));
        }

        let job = job.into_requirement(JobId::generate(), Utc::now());
        let stored = self.jobs.insert(job)?;
        info!(job_id = %stored.id, title = %stored.title, "job registered");
        Ok(stored)
    }

    /// Open postings, newest first.
    pub fn open_jobs(&self) -> Result<Vec<JobRequirement>, ApplicationServiceError> {
        let mut jobs: Vec<JobRequirement> = self
            .jobs
            .list()?
            .into_iter()
            .filter(JobRequirement::is_open)
            .collect();
        jobs.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(jobs)
    }

    /// Screen a resume and, if it clears the admission gate, create the application.
    pub fn submit(
        &self,
        candidate_id: CandidateId,
        job_id: &JobId,
        document: ResumeDocument,
    ) -> Result<SubmissionOutcome, ApplicationServiceError> {
        let job = self.job(job_id)?;
        if !job.is_open() {
            return Err(ApplicationServiceError::JobClosed(job.id));
        }

        let text = self.extractor.extract(&document).map_err(|err| {
            warn!(candidate_id = %candidate_id, job_id = %job.id, error = %err, "resume extraction failed");
            err
        })?;

        let evaluation = self.analyzer.evaluate(
            &text,
            &job.required_skills,
            job.required_experience_months,
        );
        let decision = decide_admission(&evaluation, &self.config);
        let message = decision.summary();

        if !decision.is_admitted() {
            info!(
                candidate_id = %candidate_id,
                job_id = %job.id,
                skill_match = evaluation.skill_match_percent,
                experience_match = evaluation.experience_match,
                "submission below admission threshold"
            );
            return Ok(SubmissionOutcome {
                skill_match: evaluation.skill_match_percent,
                experience_match: evaluation.experience_match,
                decision,
                application: None,
                message,
            });
        }

        let resume = self.resumes.store(&document)?;
        let application = Application {
            id: ApplicationId::generate(),
            candidate_id: candidate_id.clone(),
            job_id: job.id.clone(),
            resume,
            skill_match: evaluation.skill_match_percent,
            experience_match: evaluation.experience_match,
            priority: evaluation.priority,
            status: ApplicationStatus::Applied,
            created_at: Utc::now(),
        };

        let stored = match self.applications.insert(application.clone()) {
            Ok(stored) => stored,
            Err(err) => {
                self.discard_resume(&application.resume);
                return Err(match err {
                    RepositoryError::Conflict => ApplicationServiceError::DuplicateApplication {
                        candidate_id,
                        job_id: job.id,
                    },
                    other => other.into(),
                });
            }
        };

        info!(
            application_id = %stored.id,
            candidate_id = %stored.candidate_id,
            job_id = %stored.job_id,
            skill_match = stored.skill_match,
            priority = stored.priority,
            "application created"
        );

        Ok(SubmissionOutcome {
            skill_match: evaluation.skill_match_percent,
            experience_match: evaluation.experience_match,
            decision,
            application: Some(stored),
            message,
        })
    }

    /// Move an application along the pipeline on behalf of `actor`.
    ///
    /// The write is a compare-and-set against the status that was checked. A request that
    /// loses the race to another writer is refused with the status that writer left.
    pub fn transition_status(
        &self,
        application_id: &ApplicationId,
        requested: ApplicationStatus,
        actor: &Actor,
    ) -> Result<Application, ApplicationServiceError> {
        let application = self.get(application_id)?;
        let job = self.jobs.fetch(&application.job_id)?;

        if !actor.may_manage(job.as_ref()) {
            warn!(
                application_id = %application_id,
                actor = %actor.id,
                role = ?actor.role,
                "status change refused"
            );
            return Err(ApplicationServiceError::Unauthorized {
                actor: actor.id.clone(),
                job_id: application.job_id,
            });
        }

        let current = application.status;
        transitions::check(current, requested)?;

        match self
            .applications
            .compare_and_set_status(application_id, current, requested)
        {
            Ok(updated) => {
                info!(
                    application_id = %application_id,
                    from = %current,
                    to = %requested,
                    actor = %actor.id,
                    "application status updated"
                );
                Ok(updated)
            }
            Err(RepositoryError::StatusMismatch { current: observed }) => {
                debug!(
                    application_id = %application_id,
                    expected = %current,
                    observed = %observed,
                    "status changed underneath transition"
                );
                Err(InvalidTransition {
                    current: observed,
                    requested,
                }
                .into())
            }
            Err(RepositoryError::NotFound) => Err(ApplicationServiceError::ApplicationNotFound(
                application_id.clone(),
            )),
            Err(other) => Err(other.into()),
        }
    }

    pub fn get(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        self.applications
            .fetch(application_id)?
            .ok_or_else(|| ApplicationServiceError::ApplicationNotFound(application_id.clone()))
    }

    /// Delete one application and release its resume.
    pub fn delete_application(
        &self,
        application_id: &ApplicationId,
    ) -> Result<Application, ApplicationServiceError> {
        let application = self.get(application_id)?;
        self.remove_application(&application)?
            .ok_or_else(|| ApplicationServiceError::ApplicationNotFound(application_id.clone()))
    }

    /// Delete every application of the job, then the job itself.
    ///
    /// Removals already made are kept when a later one fails; the error reports how many
    /// went through so the caller can retry the rest.
    pub fn delete_job(&self, job_id: &JobId) -> Result<JobDeletion, ApplicationServiceError> {
        let job = self.job(job_id)?;
        let dependents = self
            .applications
            .list(&ApplicationFilter::for_job(job_id.clone()))?;

        let mut deleted = 0usize;
        for application in &dependents {
            match self.remove_application(application) {
                Ok(Some(_)) => deleted += 1,
                Ok(None) => debug!(
                    application_id = %application.id,
                    "application already removed during cascade"
                ),
                Err(err) => {
                    warn!(job_id = %job_id, deleted, error = %err, "job cascade interrupted");
                    return Err(ApplicationServiceError::CascadeInterrupted {
                        job_id: job_id.clone(),
                        deleted,
                        source: Box::new(err),
                    });
                }
            }
        }

        let removed = self.jobs.delete(job_id).map_err(|err| {
            ApplicationServiceError::CascadeInterrupted {
                job_id: job_id.clone(),
                deleted,
                source: Box::new(err.into()),
            }
        })?;
        if !removed {
            return Err(ApplicationServiceError::CascadeInterrupted {
                job_id: job_id.clone(),
                deleted,
                source: Box::new(ApplicationServiceError::JobNotFound(job_id.clone())),
            });
        }

        info!(job_id = %job_id, deleted_applications = deleted, "job deleted");
        Ok(JobDeletion {
            job,
            deleted_applications: deleted,
        })
    }

    /// Review queue: highest priority first, earliest submission breaking ties.
    pub fn applications(
        &self,
        job_id: Option<JobId>,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        let filter = ApplicationFilter {
            job_id,
            candidate_id: None,
        };
        let mut applications = self.applications.list(&filter)?;
        applications.sort_by(|left, right| {
            right
                .priority
                .cmp(&left.priority)
                .then_with(|| left.created_at.cmp(&right.created_at))
        });
        Ok(applications)
    }

    /// A candidate's own applications, newest first.
    pub fn candidate_applications(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<Vec<Application>, ApplicationServiceError> {
        let mut applications = self
            .applications
            .list(&ApplicationFilter::for_candidate(candidate_id.clone()))?;
        applications.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(applications)
    }

    pub fn stats(&self) -> Result<StatusCounts, ApplicationServiceError> {
        let applications = self.applications.list(&ApplicationFilter::default())?;
        Ok(StatusCounts::from_applications(&applications))
    }

    pub fn job_stats(&self) -> Result<Vec<JobStats>, ApplicationServiceError> {
        let jobs = self.jobs.list()?;
        let applications = self.applications.list(&ApplicationFilter::default())?;
        Ok(stats::job_stats(&jobs, &applications))
    }

    fn job(&self, job_id: &JobId) -> Result<JobRequirement, ApplicationServiceError> {
        self.jobs
            .fetch(job_id)?
            .ok_or_else(|| ApplicationServiceError::JobNotFound(job_id.clone()))
    }

    /// Release the resume, then drop the record. `None` when the record was already gone.
    fn remove_application(
        &self,
        application: &Application,
    ) -> Result<Option<Application>, ApplicationServiceError> {
        self.resumes.release(&application.resume)?;
        let removed = self.applications.delete(&application.id)?;
        if removed.is_some() {
            info!(
                application_id = %application.id,
                job_id = %application.job_id,
                "application deleted"
            );
        }
        Ok(removed)
    }

    fn discard_resume(&self, handle: &ResumeHandle) {
        if let Err(err) = self.resumes.release(handle) {
            warn!(resume = %handle, error = %err, "failed to release resume of rejected insert");
        }
    }
}

/// Error raised by the hiring workflow service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("job {0} not found")]
    JobNotFound(JobId),
    #[error("application {0} not found")]
    ApplicationNotFound(ApplicationId),
    #[error("job {0} is closed to new applications")]
    JobClosed(JobId),
    #[error("invalid job posting: {0}")]
    InvalidJob(String),
    #[error("candidate {candidate_id} already applied to job {job_id}")]
    DuplicateApplication {
        candidate_id: CandidateId,
        job_id: JobId,
    },
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    #[error("{actor} may not change applications for job {job_id}")]
    Unauthorized { actor: String, job_id: JobId },
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    ResumeStore(#[from] ResumeStoreError),
    #[error("deleting job {job_id} stopped after {deleted} application(s): {source}")]
    CascadeInterrupted {
        job_id: JobId,
        deleted: usize,
        #[source]
        source: Box<ApplicationServiceError>,
    },
}
