use serde::{Deserialize, Serialize};

/// Result of testing the required skills against a resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub percent: u8,
}

/// Substring match of each required skill against already lower-cased resume text.
///
/// Entries are counted individually, so duplicates weigh twice and an empty skill
/// matches any text.
pub fn match_skills(lowered_text: &str, required_skills: &[String]) -> SkillMatch {
    let (matched, missing): (Vec<String>, Vec<String>) = required_skills
        .iter()
        .cloned()
        .partition(|skill| lowered_text.contains(&skill.to_lowercase()));

    let percent = match_percent(matched.len(), required_skills.len());

    SkillMatch {
        matched,
        missing,
        percent,
    }
}

/// `round(100 * matched / total)` with halves rounded up, `0` for an empty requirement list.
pub fn match_percent(matched: usize, total: usize) -> u8 {
    if total == 0 || matched == 0 {
        return 0;
    }

    let matched = matched.min(total) as u64;
    let total = total as u64;
    ((200 * matched + total) / (2 * total)) as u8
}
