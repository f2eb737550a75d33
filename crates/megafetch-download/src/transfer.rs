//! Archive transfer.
//!
//! Streams a granted archive to `{id}.zip.part` and renames it to
//! `{id}.zip` only after the body has been fully written and synced, so a
//! `.zip` on disk is always complete.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use megafetch_core::{
    DownloadGrant, DownloadPort, FetchError, Outcome, artifact_path, is_plain_asset_id,
};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

/// How a transfer ended.
#[derive(Debug, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The archive was already on disk; nothing was fetched.
    AlreadyPresent,
    Succeeded { path: PathBuf, bytes: u64 },
    Failed(FetchError),
    Cancelled,
}

impl TransferOutcome {
    /// Outcome to persist, if any. Skips and cancellations are not recorded.
    pub const fn ledger_outcome(&self) -> Option<Outcome> {
        match self {
            Self::Succeeded { .. } => Some(Outcome::Succeeded),
            Self::Failed(_) => Some(Outcome::Failed),
            Self::AlreadyPresent | Self::Cancelled => None,
        }
    }
}

/// Fetches granted archives into the download directory.
#[derive(Clone)]
pub struct TransferExecutor {
    downloads: Arc<dyn DownloadPort>,
    download_dir: PathBuf,
}

impl TransferExecutor {
    pub fn new(downloads: Arc<dyn DownloadPort>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            downloads,
            download_dir: download_dir.into(),
        }
    }

    /// Fetch one archive. Never panics on I/O or remote errors; they become
    /// `TransferOutcome::Failed`.
    pub async fn fetch(&self, grant: &DownloadGrant, cancel: &CancellationToken) -> TransferOutcome {
        if !is_plain_asset_id(&grant.asset_id) {
            let err = FetchError::transfer(
                &grant.asset_id,
                None,
                "asset id is not a plain file name",
            );
            tracing::warn!(
                target: "megafetch.transfer",
                asset_id = %grant.asset_id,
                error = %err,
                "Refusing transfer"
            );
            return TransferOutcome::Failed(err);
        }

        let target = artifact_path(&self.download_dir, &grant.asset_id);
        if tokio::fs::try_exists(&target).await.unwrap_or(false) {
            tracing::debug!(
                target: "megafetch.transfer",
                asset_id = %grant.asset_id,
                "Archive already present"
            );
            return TransferOutcome::AlreadyPresent;
        }

        let part = part_path(&self.download_dir, &grant.asset_id);
        tracing::info!(
            target: "megafetch.transfer",
            asset_id = %grant.asset_id,
            download_id = %grant.download_id,
            "Downloading"
        );

        let outcome = tokio::select! {
            biased;

            () = cancel.cancelled() => TransferOutcome::Cancelled,
            result = self.stream_to(grant, &part, &target) => match result {
                Ok(bytes) => TransferOutcome::Succeeded { path: target, bytes },
                Err(e) => TransferOutcome::Failed(e),
            },
        };

        match &outcome {
            TransferOutcome::Succeeded { bytes, .. } => {
                tracing::info!(
                    target: "megafetch.transfer",
                    asset_id = %grant.asset_id,
                    bytes,
                    "Downloaded"
                );
            }
            TransferOutcome::Failed(e) => {
                remove_partial(&part).await;
                tracing::warn!(
                    target: "megafetch.transfer",
                    asset_id = %grant.asset_id,
                    status = ?e.status_code(),
                    error = %e,
                    "Download failed"
                );
            }
            TransferOutcome::Cancelled => {
                remove_partial(&part).await;
                tracing::info!(
                    target: "megafetch.transfer",
                    asset_id = %grant.asset_id,
                    "Download cancelled"
                );
            }
            TransferOutcome::AlreadyPresent => {}
        }
        outcome
    }

    async fn stream_to(
        &self,
        grant: &DownloadGrant,
        part: &Path,
        target: &Path,
    ) -> Result<u64, FetchError> {
        let asset_id = grant.asset_id.as_str();
        let io_error =
            |e: std::io::Error| FetchError::transfer(asset_id, None, format!("{}: {e}", part.display()));

        let mut stream = self
            .downloads
            .open_transfer(&grant.transfer_url)
            .await
            .map_err(|e| FetchError::transfer(asset_id, e.status_code(), e.to_string()))?;

        let mut file = tokio::fs::File::create(part).await.map_err(io_error)?;
        let mut bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                FetchError::transfer(asset_id, e.status_code(), format!("stream interrupted: {e}"))
            })?;
            file.write_all(&chunk).await.map_err(io_error)?;
            bytes += chunk.len() as u64;
        }

        file.flush().await.map_err(io_error)?;
        file.sync_all().await.map_err(io_error)?;
        drop(file);

        tokio::fs::rename(part, target).await.map_err(io_error)?;
        Ok(bytes)
    }
}

/// `{download_dir}/{asset_id}.zip.part`.
fn part_path(download_dir: &Path, asset_id: &str) -> PathBuf {
    download_dir.join(format!("{asset_id}.zip.part"))
}

async fn remove_partial(part: &Path) {
    if let Err(e) = tokio::fs::remove_file(part).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(
                target: "megafetch.transfer",
                path = %part.display(),
                error = %e,
                "Could not remove partial file"
            );
        }
    }
}
