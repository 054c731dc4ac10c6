use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for posted jobs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
}

/// Job posting as consumed by screening; never mutated by the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub id: JobId,
    pub title: String,
    pub job_type: JobType,
    pub required_skills: Vec<String>,
    pub required_experience_months: u32,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JobRequirement {
    pub fn is_open(&self) -> bool {
        self.status == JobStatus::Open
    }
}

/// Employer supplied fields for a new posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub required_experience_months: u32,
    #[serde(default)]
    pub posted_by: Option<String>,
}

impl NewJob {
    pub(crate) fn into_requirement(self, id: JobId, created_at: DateTime<Utc>) -> JobRequirement {
        let required_skills = self
            .required_skills
            .into_iter()
            .map(|skill| skill.trim().to_string())
            .filter(|skill| !skill.is_empty())
            .collect();

        JobRequirement {
            id,
            title: self.title.trim().to_string(),
            job_type: self.job_type,
            required_skills,
            required_experience_months: self.required_experience_months,
            status: JobStatus::Open,
            posted_by: self.posted_by,
            created_at,
        }
    }
}
