//! Experience mention tokenizer.
//!
//! Grammar, matched case-insensitively anywhere in the text:
//!
//! ```text
//! mention := integer ws* unit
//! integer := [0-9]+
//! unit    := "years" | "year" | "yrs" | "yr" | "months" | "month" | "mos" | "mo"
//! ```
//!
//! Units are tried longest first and need no trailing word boundary, so `"10 more"` reads as
//! ten months. Every mention in the document is accumulated: repeated or overlapping date
//! ranges are counted each time they appear.

use serde::{Deserialize, Serialize};

const MONTHS_PER_YEAR: u64 = 12;

/// Unit tokens in match priority order.
const UNIT_TOKENS: [(&str, ExperienceUnit); 8] = [
    ("years", ExperienceUnit::Years),
    ("year", ExperienceUnit::Years),
    ("yrs", ExperienceUnit::Years),
    ("yr", ExperienceUnit::Years),
    ("months", ExperienceUnit::Months),
    ("month", ExperienceUnit::Months),
    ("mos", ExperienceUnit::Months),
    ("mo", ExperienceUnit::Months),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceUnit {
    Years,
    Months,
}

impl ExperienceUnit {
    fn to_months(self, value: u64) -> u64 {
        match self {
            ExperienceUnit::Years => value.saturating_mul(MONTHS_PER_YEAR),
            ExperienceUnit::Months => value,
        }
    }
}

/// One `integer unit` occurrence found in the resume text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperienceMention {
    pub value: u64,
    pub unit: ExperienceUnit,
    pub token: &'static str,
    pub months: u64,
}

/// All mentions found in a document and their accumulated duration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExperienceSummary {
    pub mentions: Vec<ExperienceMention>,
    pub total_months: u64,
}

impl ExperienceSummary {
    /// Whole years, floored.
    pub fn years(&self) -> u64 {
        self.total_months / MONTHS_PER_YEAR
    }
}

pub fn scan(text: &str) -> ExperienceSummary {
    let mentions = tokenize(text);
    let total_months = mentions
        .iter()
        .fold(0u64, |total, mention| total.saturating_add(mention.months));

    ExperienceSummary {
        mentions,
        total_months,
    }
}

pub fn tokenize(text: &str) -> Vec<ExperienceMention> {
    let bytes = text.as_bytes();
    let mut mentions = Vec::new();
    let mut cursor = 0;

    while cursor < bytes.len() {
        if !bytes[cursor].is_ascii_digit() {
            cursor += 1;
            continue;
        }

        let start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }
        // Oversized numbers saturate instead of failing the whole scan.
        let value = text[start..cursor].parse::<u64>().unwrap_or(u64::MAX);

        let rest = &text[cursor..];
        let unit_start = rest
            .char_indices()
            .find(|(_, ch)| !ch.is_whitespace())
            .map(|(offset, _)| offset)
            .unwrap_or(rest.len());

        if let Some((token, unit)) = match_unit(&rest[unit_start..]) {
            mentions.push(ExperienceMention {
                value,
                unit,
                token,
                months: unit.to_months(value),
            });
            cursor += unit_start + token.len();
        }
    }

    mentions
}

fn match_unit(input: &str) -> Option<(&'static str, ExperienceUnit)> {
    UNIT_TOKENS.iter().copied().find(|(token, _)| {
        input
            .get(..token.len())
            .map(|prefix| prefix.eq_ignore_ascii_case(token))
            .unwrap_or(false)
    })
}
