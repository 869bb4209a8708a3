use std::fmt;

/// A valid Prolific participant ID is exactly this many characters.
pub const PROLIFIC_ID_LEN: usize = 24;

/// A listed document whose identifier failed the length rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneCandidate {
    pub id: String,
}

/// One settled delete attempt.
#[derive(Debug, Clone)]
pub struct PruneOutcome {
    pub id: String,
    pub error: Option<String>,
}

impl PruneOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PruneReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl PruneReport {
    /// Counts are derived from the settled outcomes, never from counters
    /// shared with the delete tasks.
    pub fn from_outcomes(outcomes: &[PruneOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.succeeded()).count();
        Self {
            attempted: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}

impl fmt::Display for PruneReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Deletion Summary ---")?;
        writeln!(f, "Attempted to delete: {}", self.attempted)?;
        writeln!(f, "Successfully deleted: {}", self.succeeded)?;
        writeln!(f, "Failed to delete: {}", self.failed)?;
        writeln!(f, "------------------------")?;
        write!(
            f,
            "attempted={} succeeded={} failed={}",
            self.attempted, self.succeeded, self.failed
        )
    }
}
