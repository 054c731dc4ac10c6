use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::hiring::jobs::{JobId, JobRequirement};

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the candidate account that submitted a resume.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl From<&str> for CandidateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to a stored resume file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeHandle(pub String);

impl fmt::Display for ResumeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hiring stage an application currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplicationStatus {
    Applied,
    Interviewing,
    UnderConsideration,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Applied,
            Self::Interviewing,
            Self::UnderConsideration,
            Self::Selected,
            Self::Rejected,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Interviewing => "interviewing",
            Self::UnderConsideration => "underConsideration",
            Self::Selected => "selected",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Persistent application record. Screening results are frozen at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub candidate_id: CandidateId,
    pub job_id: JobId,
    pub resume: ResumeHandle,
    pub skill_match: u8,
    pub experience_match: bool,
    pub priority: u8,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    Candidate,
    Employer,
    Administrator,
}

/// Whoever is asking for a pipeline change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: ActorRole,
}

impl Actor {
    pub fn administrator(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Administrator,
        }
    }

    pub fn employer(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Employer,
        }
    }

    pub fn candidate(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: ActorRole::Candidate,
        }
    }

    /// Administrators manage every job; employers only the jobs they posted.
    pub fn may_manage(&self, job: Option<&JobRequirement>) -> bool {
        match self.role {
            ActorRole::Administrator => true,
            ActorRole::Employer => job
                .and_then(|job| job.posted_by.as_deref())
                .map(|owner| owner == self.id)
                .unwrap_or(false),
            ActorRole::Candidate => false,
        }
    }
}

/// Narrowing applied when listing applications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationFilter {
    #[serde(default)]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub candidate_id: Option<CandidateId>,
}

impl ApplicationFilter {
    pub fn for_job(job_id: JobId) -> Self {
        Self {
            job_id: Some(job_id),
            candidate_id: None,
        }
    }

    pub fn for_candidate(candidate_id: CandidateId) -> Self {
        Self {
            job_id: None,
            candidate_id: Some(candidate_id),
        }
    }

    pub fn matches(&self, application: &Application) -> bool {
        self.job_id
            .as_ref()
            .map_or(true, |job_id| &application.job_id == job_id)
            && self
                .candidate_id
                .as_ref()
                .map_or(true, |candidate_id| &application.candidate_id == candidate_id)
    }
}
