//! Replication report types.

use serde::Serialize;
use std::fmt;

/// Outcome of a [`crate::replicate::replicate`] run.
///
/// Per-file failures are not errors; they are listed here and logged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplicationReport {
    /// Destination storage element.
    pub dest_se: String,
    /// LFNs replicated on the first attempt.
    pub replicated: Vec<String>,
    /// LFNs that failed the first pass and succeeded on retry.
    pub recovered: Vec<String>,
    /// LFNs that failed both attempts.
    pub failed: Vec<String>,
    /// PFNs, which are never replicated.
    pub skipped_pfns: Vec<String>,
}

impl ReplicationReport {
    pub fn new(dest_se: impl Into<String>) -> Self {
        Self {
            dest_se: dest_se.into(),
            ..Default::default()
        }
    }

    /// True if every LFN ended up replicated.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn succeeded_count(&self) -> usize {
        self.replicated.len() + self.recovered.len()
    }
}

impl fmt::Display for ReplicationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Replication to {}: {} replicated, {} after retry, {} failed, {} PFN(s) skipped",
            self.dest_se,
            self.replicated.len(),
            self.recovered.len(),
            self.failed.len(),
            self.skipped_pfns.len()
        )?;

        if !self.failed.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failed ({}):", self.failed.len())?;
            for lfn in &self.failed {
                writeln!(f, "  - {lfn}")?;
            }
        }

        Ok(())
    }
}
