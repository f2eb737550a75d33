//! Catalog listing and asset detail lookups.

use super::ApiClient;
use crate::error::ApiResult;
use crate::http::HttpBackend;
use crate::models::{AssetDetail, AssetListResponse};
use crate::url::{build_asset_url, build_assets_url};

impl<B: HttpBackend> ApiClient<B> {
    /// Fetch one page of the listing (1-based).
    pub(crate) async fn list_assets(
        &self,
        asset_type: &str,
        limit: u32,
        page: u32,
    ) -> ApiResult<AssetListResponse> {
        let url = build_assets_url(&self.config, asset_type, limit, page);
        let backend = &self.backend;
        let url = &url;

        let response: AssetListResponse = self
            .with_bearer(move |auth| async move { backend.get_json(url, &auth).await })
            .await?;

        tracing::debug!(
            asset_type,
            page,
            count = response.assets.len(),
            pages = response.pages,
            "Fetched listing page"
        );
        Ok(response)
    }

    /// Fetch the detail record of one asset.
    pub(crate) async fn asset_detail(&self, asset_id: &str) -> ApiResult<AssetDetail> {
        let url = build_asset_url(&self.config, asset_id);
        let backend = &self.backend;
        let url = &url;

        self.with_bearer(move |auth| async move { backend.get_json(url, &auth).await })
            .await
    }
}
