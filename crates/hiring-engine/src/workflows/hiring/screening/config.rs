use serde::{Deserialize, Serialize};

/// Admission threshold and upload bounds applied to every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningConfig {
    pub minimum_skill_match: u8,
    pub max_resume_bytes: usize,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            minimum_skill_match: 50,
            max_resume_bytes: 5 * 1024 * 1024,
        }
    }
}
