use serde::{Deserialize, Serialize};

use super::config::ScreeningConfig;
use super::ResumeEvaluation;

/// Gate outcome deciding whether an application record may be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdmissionDecision {
    Admitted,
    Rejected { reasons: Vec<String> },
}

impl AdmissionDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionDecision::Admitted)
    }

    pub fn summary(&self) -> String {
        match self {
            AdmissionDecision::Admitted => "Application submitted successfully".to_string(),
            AdmissionDecision::Rejected { .. } => {
                "Your skills or experience do not meet the job requirements".to_string()
            }
        }
    }
}

pub fn decide_admission(
    evaluation: &ResumeEvaluation,
    config: &ScreeningConfig,
) -> AdmissionDecision {
    let mut reasons = Vec::new();

    if evaluation.skill_match_percent < config.minimum_skill_match {
        reasons.push(format!(
            "skill match {}% below required {}%",
            evaluation.skill_match_percent, config.minimum_skill_match
        ));
    }

    if !evaluation.experience_match {
        reasons.push(format!(
            "{} year(s) of extracted experience does not meet the requirement",
            evaluation.extracted_experience_years
        ));
    }

    if reasons.is_empty() {
        AdmissionDecision::Admitted
    } else {
        AdmissionDecision::Rejected { reasons }
    }
}
