//! Port definitions (trait abstractions) for the remote catalog.
//!
//! Ports define the interfaces that the pipeline expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `reqwest` or `url` types in any signature
//! - Adapter errors are mapped to `ApiPortError` before crossing the port
//! - Intent-based methods (probe a download, open a transfer), not raw HTTP

pub mod catalog;
pub mod download;
pub mod error;
pub mod session;

pub use catalog::{AssetPage, CatalogPort};
pub use download::{ByteStream, DownloadPort, DownloadRequest, DownloadTicket};
pub use error::{ApiPortError, ApiPortResult};
pub use session::SessionPort;
