//! Ledger persistence.

use std::io;
use std::path::{Path, PathBuf};

use megafetch_core::{FetchError, FetchResult, Outcome};
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use super::LedgerFile;

/// Reads and atomically rewrites the ledger file.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger. A missing file is an empty ledger; a malformed one
    /// is an error so it is never silently overwritten.
    pub async fn load(&self) -> FetchResult<LedgerFile> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LedgerFile::default()),
            Err(e) => return Err(self.io_error(&e)),
        };
        if text.trim().is_empty() {
            return Ok(LedgerFile::default());
        }
        serde_json::from_str(&text).map_err(|e| self.io_error(&e))
    }

    /// Replace the ledger file: write a sibling temp file, sync, rename.
    pub async fn store(&self, ledger: &LedgerFile) -> FetchResult<()> {
        let json = to_pretty_json(ledger).map_err(|e| self.io_error(&e))?;
        let tmp = self.tmp_path();

        let write = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(&json).await?;
            file.flush().await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp, &self.path).await
        };

        if let Err(e) = write.await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(self.io_error(&e));
        }
        Ok(())
    }

    /// Load, merge one outcome, store.
    pub async fn record_outcome(&self, asset_id: &str, outcome: Outcome) -> FetchResult<()> {
        let mut ledger = self.load().await?;
        ledger.merge(asset_id, outcome);
        self.store(&ledger).await
    }

    /// True iff the asset is listed as succeeded.
    pub async fn query_completed(&self, asset_id: &str) -> FetchResult<bool> {
        Ok(self.load().await?.is_completed(asset_id))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, error: &dyn std::fmt::Display) -> FetchError {
        FetchError::ledger_io(self.path.display(), error.to_string())
    }
}

/// Pretty JSON with four-space indentation.
fn to_pretty_json(ledger: &LedgerFile) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    ledger.serialize(&mut serializer)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> LedgerStore {
        LedgerStore::new(dir.path().join("download_log.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = store_in(&dir).load().await.unwrap();
        assert_eq!(ledger, LedgerFile::default());
    }

    #[tokio::test]
    async fn test_record_and_query() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.record_outcome("a", Outcome::Succeeded).await.unwrap();
        store.record_outcome("b", Outcome::Failed).await.unwrap();

        assert!(store.query_completed("a").await.unwrap());
        assert!(!store.query_completed("b").await.unwrap());
        assert!(!store.query_completed("c").await.unwrap());
        assert!(!dir.path().join("download_log.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_written_file_is_pretty_json() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.record_outcome("a", Outcome::Succeeded).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\n    \"succeeded\""));
        assert!(text.contains("\"failed\": []"));
    }

    #[tokio::test]
    async fn test_legacy_file_is_upgraded_on_write() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"succeeded": [], "faild": ["x"]}"#).unwrap();

        store.record_outcome("y", Outcome::Succeeded).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\"failed\""));
        assert!(!text.contains("faild"));
        let ledger = store.load().await.unwrap();
        assert!(ledger.failed.contains("x"));
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{not json").unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, FetchError::LedgerIo { .. }));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = LedgerStore::new(dir.path().join("missing").join("download_log.json"));

        let err = store.record_outcome("a", Outcome::Succeeded).await.unwrap_err();
        assert!(matches!(err, FetchError::LedgerIo { .. }));
    }
}
