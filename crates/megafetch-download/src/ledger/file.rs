//! On-disk ledger document.

use indexmap::IndexSet;
use megafetch_core::Outcome;
use serde::{Deserialize, Serialize};

/// The `{"succeeded": [...], "failed": [...]}` document.
///
/// Both lists keep insertion order and never hold duplicates. An asset is
/// never listed in both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerFile {
    #[serde(default)]
    pub succeeded: IndexSet<String>,
    /// Older logs spell this key `faild`.
    #[serde(default, alias = "faild")]
    pub failed: IndexSet<String>,
}

impl LedgerFile {
    /// Merge one outcome. Success supersedes an earlier failure.
    pub fn merge(&mut self, asset_id: &str, outcome: Outcome) {
        match outcome {
            Outcome::Succeeded => {
                self.failed.shift_remove(asset_id);
                self.succeeded.insert(asset_id.to_string());
            }
            Outcome::Failed => {
                if !self.succeeded.contains(asset_id) {
                    self.failed.insert(asset_id.to_string());
                }
            }
        }
    }

    /// True iff the asset is listed as succeeded.
    pub fn is_completed(&self, asset_id: &str) -> bool {
        self.succeeded.contains(asset_id)
    }
}
