//! Asset catalog port.

use async_trait::async_trait;

use super::error::ApiPortResult;
use crate::domain::AssetRef;

/// One page of the asset listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetPage {
    /// Asset IDs in server order.
    pub asset_ids: Vec<String>,
    /// Total number of pages reported by the server.
    pub pages: u32,
}

/// Port for read-only catalog queries.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Fetch one page (1-based) of assets of `asset_type`.
    async fn list_page(&self, asset_type: &str, limit: u32, page: u32)
    -> ApiPortResult<AssetPage>;

    /// Fetch an asset's detail record (its category tags).
    async fn asset_detail(&self, asset_id: &str) -> ApiPortResult<AssetRef>;
}
