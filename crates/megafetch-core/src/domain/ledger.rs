//! Ledger outcomes and per-run accounting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal result of a transfer attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Succeeded,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// One recorded transfer outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub asset_id: String,
    pub outcome: Outcome,
    pub timestamp: DateTime<Utc>,
}

impl LedgerEntry {
    /// Create an entry stamped with the current time.
    pub fn now(asset_id: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            asset_id: asset_id.into(),
            outcome,
            timestamp: Utc::now(),
        }
    }

    pub fn succeeded(asset_id: impl Into<String>) -> Self {
        Self::now(asset_id, Outcome::Succeeded)
    }

    pub fn failed(asset_id: impl Into<String>) -> Self {
        Self::now(asset_id, Outcome::Failed)
    }
}

/// Counters describing what a single pipeline run did.
///
/// Every enumerated asset ends up in exactly one bucket, except assets whose
/// transfer was still pending when enumeration aborted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Asset IDs produced by the catalog enumerator.
    pub enumerated: u64,
    /// Skipped because an artifact or a Succeeded ledger entry exists.
    pub already_complete: u64,
    /// Excluded by the priority filter.
    pub filtered_out: u64,
    /// Grant negotiation failed (no transfer attempted, no ledger entry).
    pub negotiation_failed: u64,
    /// Transfers recorded as Succeeded.
    pub succeeded: u64,
    /// Transfers recorded as Failed.
    pub failed: u64,
    /// Transfers aborted by cancellation.
    pub cancelled: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    /// Start a summary stamped with the current time.
    pub fn started() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    pub fn record_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Succeeded => self.succeeded += 1,
            Outcome::Failed => self.failed += 1,
        }
    }

    /// Number of transfer attempts that reached the ledger.
    pub const fn transfers(&self) -> u64 {
        self.succeeded + self.failed
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} enumerated, {} already complete, {} filtered out, {} negotiation failures, \
             {} downloaded, {} failed, {} cancelled",
            self.enumerated,
            self.already_complete,
            self.filtered_out,
            self.negotiation_failed,
            self.succeeded,
            self.failed,
            self.cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_outcome_updates_matching_counter() {
        let mut summary = RunSummary::started();
        summary.record_outcome(Outcome::Succeeded);
        summary.record_outcome(Outcome::Succeeded);
        summary.record_outcome(Outcome::Failed);

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.transfers(), 3);
        assert!(summary.started_at.is_some());
        assert!(summary.finished_at.is_none());
    }

    #[test]
    fn summary_display_mentions_every_bucket() {
        let summary = RunSummary {
            enumerated: 10,
            already_complete: 2,
            filtered_out: 3,
            negotiation_failed: 1,
            succeeded: 3,
            failed: 1,
            ..RunSummary::default()
        };
        let text = summary.to_string();
        assert!(text.contains("10 enumerated"));
        assert!(text.contains("3 filtered out"));
        assert!(text.contains("1 negotiation failures"));
    }

    #[test]
    fn ledger_entry_constructors() {
        let ok = LedgerEntry::succeeded("abc");
        assert_eq!(ok.asset_id, "abc");
        assert_eq!(ok.outcome, Outcome::Succeeded);
        assert_eq!(LedgerEntry::failed("x").outcome, Outcome::Failed);
    }
}
