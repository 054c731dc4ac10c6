use serde::{Deserialize, Serialize};

pub const BASE_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

/// Skill match above this percentage earns a priority point.
const STRONG_SKILL_MATCH: u8 = 75;

const CREDENTIAL_KEYWORDS: [&str; 2] = ["certification", "certified"];
const ACADEMIC_KEYWORDS: [&str; 2] = ["honors", "distinction"];

/// Signals a priority rule can award points for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityFactor {
    Credentials,
    Experience,
    SkillStrength,
    AcademicRecognition,
}

/// Discrete contribution to the priority score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityComponent {
    pub factor: PriorityFactor,
    pub points: u8,
    pub notes: String,
}

pub(crate) struct PrioritySignals<'a> {
    pub lowered_text: &'a str,
    pub extracted_years: u64,
    pub required_experience_months: u32,
    pub skill_match_percent: u8,
}

/// Apply every rule and clamp the sum into `BASE_PRIORITY..=MAX_PRIORITY`.
pub(crate) fn score_priority(signals: &PrioritySignals<'_>) -> (u8, Vec<PriorityComponent>) {
    let mut components = Vec::new();

    if let Some(keyword) = first_keyword(signals.lowered_text, &CREDENTIAL_KEYWORDS) {
        components.push(PriorityComponent {
            factor: PriorityFactor::Credentials,
            points: 1,
            notes: format!("mentions '{keyword}'"),
        });
    }

    // Requirement is compared in years here, including fractional halves.
    let experience_months = signals.extracted_years.saturating_mul(12);
    let required = u64::from(signals.required_experience_months);
    if experience_months >= required {
        components.push(PriorityComponent {
            factor: PriorityFactor::Experience,
            points: 2,
            notes: format!(
                "{} year(s) meets required {required} month(s)",
                signals.extracted_years
            ),
        });
    } else if experience_months.saturating_mul(2) >= required {
        components.push(PriorityComponent {
            factor: PriorityFactor::Experience,
            points: 1,
            notes: format!(
                "{} year(s) covers at least half of required {required} month(s)",
                signals.extracted_years
            ),
        });
    }

    if signals.skill_match_percent > STRONG_SKILL_MATCH {
        components.push(PriorityComponent {
            factor: PriorityFactor::SkillStrength,
            points: 1,
            notes: format!(
                "skill match {}% above {STRONG_SKILL_MATCH}%",
                signals.skill_match_percent
            ),
        });
    }

    if let Some(keyword) = first_keyword(signals.lowered_text, &ACADEMIC_KEYWORDS) {
        components.push(PriorityComponent {
            factor: PriorityFactor::AcademicRecognition,
            points: 1,
            notes: format!("mentions '{keyword}'"),
        });
    }

    let total = components
        .iter()
        .fold(BASE_PRIORITY, |total, component| {
            total.saturating_add(component.points)
        })
        .min(MAX_PRIORITY);

    (total, components)
}

fn first_keyword(text: &str, keywords: &[&'static str]) -> Option<&'static str> {
    keywords.iter().copied().find(|keyword| text.contains(keyword))
}
