//! Completion ledger.
//!
//! `download_log.json` records which assets finished and which failed. The
//! file is only ever mutated by the writer task in `writer`.

mod file;
mod store;
mod writer;

pub use file::LedgerFile;
pub use store::LedgerStore;
pub use writer::{LedgerCounts, LedgerHandle, LedgerTask, spawn_writer};
