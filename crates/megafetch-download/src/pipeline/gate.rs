//! Idempotence gate.

use std::path::PathBuf;

use megafetch_core::{artifact_path, is_plain_asset_id};

use crate::ledger::LedgerFile;

/// Decides whether an asset needs no further work.
///
/// An asset is complete when its archive exists or the ledger lists it as
/// succeeded. Failed entries never make an asset complete.
pub struct CompletionGate {
    download_dir: PathBuf,
    ledger: LedgerFile,
}

impl CompletionGate {
    pub fn new(download_dir: impl Into<PathBuf>, ledger: LedgerFile) -> Self {
        Self {
            download_dir: download_dir.into(),
            ledger,
        }
    }

    pub async fn is_complete(&self, asset_id: &str) -> bool {
        if self.ledger.is_completed(asset_id) {
            return true;
        }
        if !is_plain_asset_id(asset_id) {
            return false;
        }
        tokio::fs::try_exists(artifact_path(&self.download_dir, asset_id))
            .await
            .unwrap_or(false)
    }
}
