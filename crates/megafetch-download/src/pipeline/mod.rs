//! Pipeline driver.
//!
//! Enumeration, filtering and negotiation run sequentially on the driver
//! task. Each grant is handed to a transfer task on a bounded pool; a
//! permit is acquired before spawning, so at most `max_concurrent`
//! transfers exist at once. Outcomes reach the ledger through its single
//! writer task.

mod gate;

use std::sync::Arc;

use megafetch_core::{
    CatalogPort, Credentials, DownloadGrant, DownloadPort, FetchConfig, FetchError, FetchResult,
    LedgerEntry, RunSummary, SessionPort,
};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::enumerator::CatalogEnumerator;
use crate::filter::PriorityFilter;
use crate::ledger::{LedgerStore, spawn_writer};
use crate::negotiator::GrantNegotiator;
use crate::transfer::{TransferExecutor, TransferOutcome};

pub use gate::CompletionGate;

/// Ports the pipeline talks to.
#[derive(Clone)]
pub struct PipelineDeps {
    pub session: Arc<dyn SessionPort>,
    pub catalog: Arc<dyn CatalogPort>,
    pub downloads: Arc<dyn DownloadPort>,
}

impl PipelineDeps {
    /// Use one client for every port.
    pub fn from_client<C>(client: Arc<C>) -> Self
    where
        C: SessionPort + CatalogPort + DownloadPort + 'static,
    {
        Self {
            session: client.clone(),
            catalog: client.clone(),
            downloads: client,
        }
    }
}

/// Why an enumerated asset was not dispatched.
enum Skip {
    AlreadyComplete,
    FilteredOut,
    NegotiationFailed,
}

/// Per-run stages, built once the session is established.
struct Stages {
    gate: CompletionGate,
    filter: PriorityFilter,
    negotiator: GrantNegotiator,
}

impl Stages {
    async fn prepare(&self, asset_id: &str) -> Result<DownloadGrant, Skip> {
        if self.gate.is_complete(asset_id).await {
            tracing::debug!(target: "megafetch.pipeline", asset_id, "Already complete");
            return Err(Skip::AlreadyComplete);
        }
        if !self.filter.is_priority(asset_id).await {
            return Err(Skip::FilteredOut);
        }
        self.negotiator
            .negotiate(asset_id)
            .await
            .map_err(|_| Skip::NegotiationFailed)
    }
}

/// The bulk fetch pipeline.
pub struct FetchPipeline {
    deps: PipelineDeps,
    config: FetchConfig,
    credentials: Credentials,
}

impl FetchPipeline {
    pub const fn new(deps: PipelineDeps, config: FetchConfig, credentials: Credentials) -> Self {
        Self {
            deps,
            config,
            credentials,
        }
    }

    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Run one batch to completion or cancellation.
    ///
    /// Per-asset failures are counted in the summary. Authentication,
    /// enumeration and ledger failures abort the run with an error. A
    /// cancelled run still returns its summary.
    pub async fn run(&self, cancel: CancellationToken) -> FetchResult<RunSummary> {
        let mut summary = RunSummary::started();
        tracing::info!(
            target: "megafetch.pipeline",
            download_dir = %self.config.download_dir.display(),
            asset_type = %self.config.asset_type,
            max_concurrent = self.config.max_concurrent,
            "Starting run"
        );

        self.deps
            .session
            .authenticate(&self.credentials)
            .await
            .map_err(|e| {
                tracing::error!(target: "megafetch.pipeline", error = %e, "Authentication failed");
                FetchError::auth(e.to_string())
            })?;

        let store = LedgerStore::new(self.config.ledger_path());
        let stages = Stages {
            gate: CompletionGate::new(&self.config.download_dir, store.load().await?),
            filter: PriorityFilter::new(
                Arc::clone(&self.deps.catalog),
                &self.config.priority_categories,
            ),
            negotiator: GrantNegotiator::new(
                Arc::clone(&self.deps.downloads),
                self.config.component_types.clone(),
                self.config.mime_type.clone(),
            ),
        };
        let executor = TransferExecutor::new(
            Arc::clone(&self.deps.downloads),
            self.config.download_dir.clone(),
        );

        let run_cancel = cancel.child_token();
        let (ledger, ledger_task) = spawn_writer(store, run_cancel.clone());

        let mut ids = CatalogEnumerator::new(Arc::clone(&self.deps.catalog), self.config.page_size)
            .list_asset_ids(&self.config.asset_type);
        let permits = Arc::new(Semaphore::new(self.config.max_concurrent));
        let mut tasks = JoinSet::new();
        let mut enumeration_error = None;

        loop {
            let next = tokio::select! {
                biased;
                () = run_cancel.cancelled() => break,
                next = ids.next() => next,
            };
            let asset_id = match next {
                None => break,
                Some(Ok(id)) => id,
                Some(Err(e)) => {
                    enumeration_error = Some(e);
                    break;
                }
            };
            summary.enumerated += 1;

            let prepared = tokio::select! {
                biased;
                () = run_cancel.cancelled() => break,
                prepared = stages.prepare(&asset_id) => prepared,
            };
            let grant = match prepared {
                Ok(grant) => grant,
                Err(Skip::AlreadyComplete) => {
                    summary.already_complete += 1;
                    continue;
                }
                Err(Skip::FilteredOut) => {
                    summary.filtered_out += 1;
                    continue;
                }
                Err(Skip::NegotiationFailed) => {
                    summary.negotiation_failed += 1;
                    continue;
                }
            };

            let permit = tokio::select! {
                biased;
                () = run_cancel.cancelled() => break,
                permit = Arc::clone(&permits).acquire_owned() => permit,
            };
            let Ok(permit) = permit else { break };

            while let Some(joined) = tasks.try_join_next() {
                absorb(joined, &mut summary);
            }

            let executor = executor.clone();
            let ledger = ledger.clone();
            let cancel = run_cancel.clone();
            tasks.spawn(async move {
                let _permit = permit;
                let outcome = executor.fetch(&grant, &cancel).await;
                if let Some(result) = outcome.ledger_outcome() {
                    ledger
                        .record(LedgerEntry::now(grant.asset_id.clone(), result))
                        .await;
                }
                outcome
            });
        }

        while let Some(joined) = tasks.join_next().await {
            absorb(joined, &mut summary);
        }
        drop(ledger);
        let counts = ledger_task.finish().await?;
        summary.succeeded = counts.succeeded;
        summary.failed = counts.failed;
        summary.finish();

        if let Some(e) = enumeration_error {
            tracing::error!(target: "megafetch.pipeline", error = %e, "Run aborted: {summary}");
            return Err(e);
        }
        if cancel.is_cancelled() {
            tracing::info!(target: "megafetch.pipeline", "Run cancelled: {summary}");
        } else {
            tracing::info!(target: "megafetch.pipeline", "Run complete: {summary}");
        }
        Ok(summary)
    }
}

fn absorb(joined: Result<TransferOutcome, JoinError>, summary: &mut RunSummary) {
    match joined {
        // Counted from the ledger writer.
        Ok(TransferOutcome::Succeeded { .. } | TransferOutcome::Failed(_)) => {}
        Ok(TransferOutcome::AlreadyPresent) => summary.already_complete += 1,
        Ok(TransferOutcome::Cancelled) => summary.cancelled += 1,
        Err(e) => {
            tracing::error!(target: "megafetch.pipeline", error = %e, "Transfer task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBody, FakeCatalog, FakeDownloads};
    use async_trait::async_trait;
    use bytes::Bytes;
    use megafetch_core::{ApiPortError, ApiPortResult, Session};
    use tempfile::TempDir;

    struct FakeSession {
        reject: bool,
    }

    #[async_trait]
    impl SessionPort for FakeSession {
        async fn authenticate(&self, _credentials: &Credentials) -> ApiPortResult<Session> {
            if self.reject {
                return Err(ApiPortError::Unauthorized {
                    message: "bad password".to_string(),
                });
            }
            Ok(Session::new("token", None))
        }

        async fn reauthenticate(&self) -> ApiPortResult<Session> {
            Ok(Session::new("token", None))
        }
    }

    fn pipeline(
        catalog: &Arc<FakeCatalog>,
        downloads: &Arc<FakeDownloads>,
        dir: &TempDir,
    ) -> FetchPipeline {
        FetchPipeline::new(
            PipelineDeps {
                session: Arc::new(FakeSession { reject: false }),
                catalog: catalog.clone(),
                downloads: downloads.clone(),
            },
            FetchConfig::new(dir.path()).with_max_concurrent(2),
            Credentials::new("u", "p", "k", "app"),
        )
    }

    #[tokio::test]
    async fn test_run_buckets_every_asset() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("present.zip"), b"PK").unwrap();

        let catalog = Arc::new(
            FakeCatalog::paged(&[&["present", "wood", "nocomp"], &["good", "broken"]])
                .with_categories("wood", &["wood"])
                .with_categories("nocomp", &["rock"])
                .with_categories("good", &["Rock"])
                .with_categories("broken", &["moss"]),
        );
        let downloads = Arc::new(
            FakeDownloads::new()
                .with_components("nocomp", &["foo"])
                .with_components("good", &["albedo"])
                .with_components("broken", &["normal"])
                .with_body(
                    "dl-broken",
                    FakeBody::FailAfter(
                        vec![Bytes::from_static(b"PK")],
                        ApiPortError::Network {
                            message: "reset".to_string(),
                        },
                    ),
                ),
        );

        let summary = pipeline(&catalog, &downloads, &dir)
            .run(CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(summary.enumerated, 5);
        assert_eq!(summary.already_complete, 1);
        assert_eq!(summary.filtered_out, 1);
        assert_eq!(summary.negotiation_failed, 1);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.cancelled, 0);
        assert!(summary.finished_at.is_some());

        // The present archive was never looked up.
        assert!(!catalog.detail_requests().contains(&"present".to_string()));

        let ledger = LedgerStore::new(dir.path().join("download_log.json"))
            .load()
            .await
            .unwrap();
        assert!(ledger.is_completed("good"));
        assert!(ledger.failed.contains("broken"));
        assert_eq!(ledger.succeeded.len() + ledger.failed.len(), 2);
    }

    #[tokio::test]
    async fn test_auth_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog::paged(&[&["a"]]));
        let pipeline = FetchPipeline::new(
            PipelineDeps {
                session: Arc::new(FakeSession { reject: true }),
                catalog: catalog.clone(),
                downloads: Arc::new(FakeDownloads::new()),
            },
            FetchConfig::new(dir.path()),
            Credentials::new("u", "p", "k", "app"),
        );

        let err = pipeline.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, FetchError::Auth { .. }));
        assert!(catalog.page_requests().is_empty());
    }

    #[tokio::test]
    async fn test_enumeration_failure_aborts_after_draining() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(
            FakeCatalog::paged(&[&["a"], &["b"]])
                .with_categories("a", &["rock"])
                .failing_page(
                    2,
                    ApiPortError::Status {
                        status: 500,
                        message: "boom".to_string(),
                    },
                ),
        );
        let downloads = Arc::new(FakeDownloads::new().with_components("a", &["albedo"]));

        let err = pipeline(&catalog, &downloads, &dir)
            .run(CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Enumeration { page: 2, .. }));
        // The transfer dispatched before the failure still reached the ledger.
        assert!(
            LedgerStore::new(dir.path().join("download_log.json"))
                .query_completed("a")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_malformed_ledger_aborts_before_enumeration() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("download_log.json"), "[[[").unwrap();
        let catalog = Arc::new(FakeCatalog::paged(&[&["a"]]));
        let downloads = Arc::new(FakeDownloads::new());

        let err = pipeline(&catalog, &downloads, &dir)
            .run(CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::LedgerIo { .. }));
        assert!(catalog.page_requests().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_start_dispatches_nothing() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(FakeCatalog::paged(&[&["a"]]).with_categories("a", &["rock"]));
        let downloads = Arc::new(FakeDownloads::new().with_components("a", &["albedo"]));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let summary = pipeline(&catalog, &downloads, &dir).run(cancel).await.unwrap();

        assert_eq!(summary.enumerated, 0);
        assert!(downloads.requests().is_empty());
        assert!(!dir.path().join("download_log.json").exists());
    }
}
