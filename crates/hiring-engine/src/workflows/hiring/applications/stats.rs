//! Read-only projections over the stored applications. Nothing here is persisted.

use std::collections::HashMap;

use serde::Serialize;

use super::domain::{Application, ApplicationStatus};
use crate::workflows::hiring::jobs::{JobId, JobRequirement, JobStatus, JobType};

/// Application counts per pipeline status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub applied: usize,
    pub interviewing: usize,
    pub under_consideration: usize,
    pub selected: usize,
    pub rejected: usize,
}

impl StatusCounts {
    pub fn from_applications<'a>(applications: impl IntoIterator<Item = &'a Application>) -> Self {
        applications
            .into_iter()
            .fold(Self::default(), |mut counts, application| {
                counts.record(application.status);
                counts
            })
    }

    pub fn record(&mut self, status: ApplicationStatus) {
        self.total += 1;
        match status {
            ApplicationStatus::Applied => self.applied += 1,
            ApplicationStatus::Interviewing => self.interviewing += 1,
            ApplicationStatus::UnderConsideration => self.under_consideration += 1,
            ApplicationStatus::Selected => self.selected += 1,
            ApplicationStatus::Rejected => self.rejected += 1,
        }
    }

    pub fn get(&self, status: ApplicationStatus) -> usize {
        match status {
            ApplicationStatus::Applied => self.applied,
            ApplicationStatus::Interviewing => self.interviewing,
            ApplicationStatus::UnderConsideration => self.under_consideration,
            ApplicationStatus::Selected => self.selected,
            ApplicationStatus::Rejected => self.rejected,
        }
    }
}

/// Applicant volume for one posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStats {
    pub job_id: JobId,
    pub title: String,
    pub job_type: JobType,
    pub job_status: JobStatus,
    pub application_count: usize,
    pub status_counts: StatusCounts,
}

/// One entry per job, busiest first. Applications whose job is gone are skipped.
pub fn job_stats(jobs: &[JobRequirement], applications: &[Application]) -> Vec<JobStats> {
    let mut per_job: HashMap<&JobId, StatusCounts> = HashMap::new();
    for application in applications {
        per_job
            .entry(&application.job_id)
            .or_default()
            .record(application.status);
    }

    let mut stats: Vec<JobStats> = jobs
        .iter()
        .map(|job| {
            let status_counts = per_job.get(&job.id).copied().unwrap_or_default();
            JobStats {
                job_id: job.id.clone(),
                title: job.title.clone(),
                job_type: job.job_type,
                job_status: job.status,
                application_count: status_counts.total,
                status_counts,
            }
        })
        .collect();

    stats.sort_by(|left, right| {
        right
            .application_count
            .cmp(&left.application_count)
            .then_with(|| left.title.cmp(&right.title))
            .then_with(|| left.job_id.cmp(&right.job_id))
    });
    stats
}
