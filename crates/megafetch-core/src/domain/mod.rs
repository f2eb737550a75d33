//! Core domain types for the fetch pipeline.
//!
//! Pure data types with no I/O dependencies.

mod asset;
mod ledger;
mod session;

pub use asset::{AssetRef, ComponentType, DownloadGrant};
pub use ledger::{LedgerEntry, Outcome, RunSummary};
pub use session::{Credentials, Session};
