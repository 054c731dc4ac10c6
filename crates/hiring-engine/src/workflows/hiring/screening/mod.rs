//! Resume screening: text extraction, skill matching, experience extraction, and priority.

mod config;
mod document;
pub mod experience;
mod policy;
mod priority;
mod skills;

pub use config::ScreeningConfig;
pub use document::{
    DocumentError, DocumentFormat, DocumentTextExtractor, ResumeDocument, TextExtractor,
};
pub use experience::{ExperienceMention, ExperienceSummary, ExperienceUnit};
pub use policy::{decide_admission, AdmissionDecision};
pub use priority::{PriorityComponent, PriorityFactor, BASE_PRIORITY, MAX_PRIORITY};
pub use skills::{match_percent, SkillMatch};

use priority::{score_priority, PrioritySignals};
use serde::{Deserialize, Serialize};

/// Stateless analyzer turning resume text and job requirements into an evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResumeAnalyzer;

impl ResumeAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(
        &self,
        resume_text: &str,
        required_skills: &[String],
        required_experience_months: u32,
    ) -> ResumeEvaluation {
        let lowered = resume_text.to_lowercase();

        let skills = skills::match_skills(&lowered, required_skills);
        let experience = experience::scan(&lowered);
        let years = experience.years();

        let (priority, priority_components) = score_priority(&PrioritySignals {
            lowered_text: &lowered,
            extracted_years: years,
            required_experience_months,
            skill_match_percent: skills.percent,
        });

        ResumeEvaluation {
            skill_match_percent: skills.percent,
            // Years against months, as the portal has always compared them.
            experience_match: years >= u64::from(required_experience_months),
            priority,
            extracted_experience_years: u32::try_from(years).unwrap_or(u32::MAX),
            matched_skills: skills.matched,
            priority_components,
        }
    }
}

/// Evaluation output for a single resume against a single job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeEvaluation {
    pub skill_match_percent: u8,
    pub experience_match: bool,
    pub priority: u8,
    pub extracted_experience_years: u32,
    pub matched_skills: Vec<String>,
    pub priority_components: Vec<PriorityComponent>,
}
