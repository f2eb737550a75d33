//! Pipeline error taxonomy.
//!
//! These errors carry strings rather than foreign error types so they can be
//! cloned into summaries and logs. Adapter errors (HTTP, JSON, I/O) are
//! mapped into them at the crate boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which step of grant negotiation failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NegotiationStage {
    /// The unscoped request that reveals available component types.
    Probe,
    /// None of the available component types are recognized.
    NoComponents,
    /// The request scoped to the selected component types.
    Scoped,
}

impl fmt::Display for NegotiationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probe => f.write_str("probe"),
            Self::NoComponents => f.write_str("component selection"),
            Self::Scoped => f.write_str("scoped request"),
        }
    }
}

/// Error type for pipeline operations.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchError {
    /// Authentication failed. Fatal: nothing can proceed without a token.
    #[error("Authentication failed: {message}")]
    Auth {
        message: String,
    },

    /// A listing page could not be fetched. Fatal for the current run.
    #[error("Enumeration of '{asset_type}' failed at page {page}: {message}")]
    Enumeration {
        asset_type: String,
        page: u32,
        message: String,
    },

    /// Grant negotiation failed for one asset. The asset is skipped.
    #[error("Negotiation for asset {asset_id} failed during {stage}: {message}")]
    Negotiation {
        asset_id: String,
        stage: NegotiationStage,
        /// HTTP status code if the remote answered.
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        message: String,
    },

    /// Transfer failed for one asset. Recorded in the ledger as Failed.
    #[error("Transfer of asset {asset_id} failed: {message}")]
    Transfer {
        asset_id: String,
        /// HTTP status code if the remote answered.
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        message: String,
    },

    /// The completion ledger could not be read or written. Fatal.
    #[error("Ledger I/O error at {path}: {message}")]
    LedgerIo {
        path: String,
        message: String,
    },

    /// The run or transfer was cancelled.
    #[error("Cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn enumeration(asset_type: impl Into<String>, page: u32, message: impl Into<String>) -> Self {
        Self::Enumeration {
            asset_type: asset_type.into(),
            page,
            message: message.into(),
        }
    }

    pub fn negotiation(
        asset_id: impl Into<String>,
        stage: NegotiationStage,
        status_code: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Negotiation {
            asset_id: asset_id.into(),
            stage,
            status_code,
            message: message.into(),
        }
    }

    pub fn transfer(
        asset_id: impl Into<String>,
        status_code: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::Transfer {
            asset_id: asset_id.into(),
            status_code,
            message: message.into(),
        }
    }

    pub fn ledger_io(path: impl fmt::Display, message: impl Into<String>) -> Self {
        Self::LedgerIo {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Whether this error must abort the whole batch.
    ///
    /// Per-asset failures (negotiation, transfer) never abort a batch.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Auth { .. } | Self::Enumeration { .. } | Self::LedgerIo { .. }
        )
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// HTTP status reported by the remote, if any.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Negotiation { status_code, .. } | Self::Transfer { status_code, .. } => {
                *status_code
            }
            _ => None,
        }
    }
}

/// Convenience result type for pipeline operations.
pub type FetchResult<T> = Result<T, FetchError>;
