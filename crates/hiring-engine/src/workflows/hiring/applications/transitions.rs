//! Hiring pipeline transition table.

use super::domain::ApplicationStatus;
use super::domain::ApplicationStatus::{
    Applied, Interviewing, Rejected, Selected, UnderConsideration,
};

/// Adjacency list: each status and the statuses it may move to.
const TRANSITIONS: [(ApplicationStatus, &[ApplicationStatus]); 5] = [
    (Applied, &[Interviewing]),
    (Interviewing, &[UnderConsideration, Rejected]),
    (UnderConsideration, &[Selected, Rejected]),
    (Selected, &[]),
    (Rejected, &[]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid status transition from {current} to {requested}")]
pub struct InvalidTransition {
    pub current: ApplicationStatus,
    pub requested: ApplicationStatus,
}

pub fn allowed_targets(from: ApplicationStatus) -> &'static [ApplicationStatus] {
    TRANSITIONS
        .iter()
        .find(|(status, _)| *status == from)
        .map(|(_, targets)| *targets)
        .unwrap_or(&[])
}

pub fn is_terminal(status: ApplicationStatus) -> bool {
    allowed_targets(status).is_empty()
}

pub fn check(
    current: ApplicationStatus,
    requested: ApplicationStatus,
) -> Result<(), InvalidTransition> {
    if allowed_targets(current).contains(&requested) {
        Ok(())
    } else {
        Err(InvalidTransition { current, requested })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_hiring_pipeline() {
        assert_eq!(allowed_targets(Applied), &[Interviewing]);
        assert_eq!(allowed_targets(Interviewing), &[UnderConsideration, Rejected]);
        assert_eq!(allowed_targets(UnderConsideration), &[Selected, Rejected]);
    }

    #[test]
    fn terminal_states_reject_every_request() {
        for terminal in [Selected, Rejected] {
            assert!(is_terminal(terminal));
            for requested in ApplicationStatus::ordered() {
                let err = check(terminal, requested).expect_err("terminal states have no exits");
                assert_eq!(err.current, terminal);
                assert_eq!(err.requested, requested);
            }
        }
    }

    #[test]
    fn no_status_loops_to_itself() {
        for status in ApplicationStatus::ordered() {
            assert!(check(status, status).is_err());
        }
    }

    #[test]
    fn stages_cannot_be_skipped() {
        assert!(check(Applied, Selected).is_err());
        assert!(check(Applied, Rejected).is_err());
        assert!(check(Interviewing, Selected).is_err());
        assert!(check(UnderConsideration, Interviewing).is_err());
    }

    #[test]
    fn error_names_both_statuses() {
        let err = check(Applied, UnderConsideration).expect_err("skips interviewing");
        assert_eq!(
            err.to_string(),
            "invalid status transition from applied to underConsideration"
        );
    }
}
