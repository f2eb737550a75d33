#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types for convenience
pub use config::{
    DEFAULT_ASSET_TYPE, DEFAULT_MIME_TYPE, DEFAULT_PAGE_SIZE, FetchConfig, LEDGER_FILE_NAME,
    artifact_path, is_plain_asset_id,
};
pub use domain::{
    AssetRef, ComponentType, Credentials, DownloadGrant, LedgerEntry, Outcome, RunSummary, Session,
};
pub use error::{FetchError, FetchResult, NegotiationStage};
pub use ports::{
    ApiPortError, ApiPortResult, AssetPage, ByteStream, CatalogPort, DownloadPort,
    DownloadRequest, DownloadTicket, SessionPort,
};

// Silence unused dev-dependency warnings; serde_json is only used in tests
#[cfg(test)]
use serde_json as _;
