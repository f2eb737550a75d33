//! Download endpoint port.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use super::error::ApiPortResult;
use crate::domain::ComponentType;

/// Streamed archive body.
pub type ByteStream = BoxStream<'static, ApiPortResult<Bytes>>;

/// A request against the download endpoint.
///
/// Without components this is a probe: the remote answers with every
/// component type the asset offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub asset_id: String,
    pub components: Option<Vec<ComponentType>>,
    /// Mime type requested for every component (ignored for probes).
    pub mime_type: String,
}

impl DownloadRequest {
    /// Unscoped request revealing the available component types.
    pub fn probe(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            components: None,
            mime_type: String::new(),
        }
    }

    /// Request restricted to `components`, each tagged with `mime_type`.
    pub fn scoped(
        asset_id: impl Into<String>,
        components: Vec<ComponentType>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            components: Some(components),
            mime_type: mime_type.into(),
        }
    }

    pub const fn is_probe(&self) -> bool {
        self.components.is_none()
    }
}

/// The remote's answer to a download request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadTicket {
    pub download_id: String,
    pub asset_id: String,
    /// Component type tags exactly as reported (may include unrecognized ones).
    pub components: Vec<String>,
}

/// Port for download negotiation and archive transfer.
#[async_trait]
pub trait DownloadPort: Send + Sync {
    /// Issue a download request (probe or scoped).
    async fn request_download(&self, request: &DownloadRequest) -> ApiPortResult<DownloadTicket>;

    /// Build the transfer URL for an issued download.
    fn transfer_url(&self, download_id: &str) -> String;

    /// Open an authorized byte stream for a transfer URL.
    async fn open_transfer(&self, transfer_url: &str) -> ApiPortResult<ByteStream>;
}
