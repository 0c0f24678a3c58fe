use std::fmt;

use crate::model::{Quarters, Score};

/// Why a score was kept out of the corpus. Exclusion is filtering policy,
/// not a failure; the corpus builder counts these and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    DisallowedDuration(Quarters),
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::DisallowedDuration(d) => {
                write!(f, "uses the disallowed duration {d}")
            }
        }
    }
}

/// Checks every event's quarter-length duration against the allowed set.
/// The first offending event decides; comparison is exact (rational).
pub fn screen(score: &Score, allowed: &[Quarters]) -> Result<(), ExclusionReason> {
    for event in &score.events {
        let duration = event.duration();
        if !allowed.contains(&duration) {
            return Err(ExclusionReason::DisallowedDuration(duration));
        }
    }
    Ok(())
}
