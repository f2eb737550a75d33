#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod enumerator;
pub mod filter;
pub mod ledger;
pub mod negotiator;
pub mod pipeline;
pub mod transfer;

#[cfg(test)]
mod testing;

pub use enumerator::{AssetIds, CatalogEnumerator};
pub use filter::PriorityFilter;
pub use ledger::{LedgerCounts, LedgerFile, LedgerHandle, LedgerStore, LedgerTask, spawn_writer};
pub use negotiator::{GrantNegotiator, select_components};
pub use pipeline::{CompletionGate, FetchPipeline, PipelineDeps};
pub use transfer::{TransferExecutor, TransferOutcome};

// Silence unused dev-dependency warnings; tokio-test is only used by integration tests
#[cfg(test)]
use tokio_test as _;
