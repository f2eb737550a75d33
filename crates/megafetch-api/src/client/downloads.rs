//! Download grant requests and archive transfers.

use url::Url;

use super::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::http::{HttpBackend, HttpStream};
use crate::models::{DownloadRequestBody, DownloadResponse};
use crate::url::{build_downloads_url, build_transfer_url};

impl<B: HttpBackend> ApiClient<B> {
    /// Request a download grant. Without components this is a probe, and
    /// only the component list of the response is meaningful.
    pub(crate) async fn request_download(
        &self,
        body: &DownloadRequestBody,
    ) -> ApiResult<DownloadResponse> {
        let url = build_downloads_url(&self.config);
        let json = serde_json::to_value(body)?;
        let backend = &self.backend;
        let url = &url;
        let json = &json;

        let response: DownloadResponse = self
            .with_bearer(move |auth| async move { backend.post_json(url, &auth, json).await })
            .await?;

        if body.components.is_some() && response.id.is_empty() {
            return Err(ApiError::InvalidResponse {
                message: format!("download request for {} returned no id", body.asset),
            });
        }
        Ok(response)
    }

    /// Transfer URL for a granted download.
    pub(crate) fn transfer_url(&self, download_id: &str) -> Url {
        build_transfer_url(&self.config, download_id)
    }

    /// Open the archive byte stream for a transfer URL.
    pub(crate) async fn open_transfer(&self, transfer_url: &str) -> ApiResult<HttpStream> {
        let url = Url::parse(transfer_url)?;
        let backend = &self.backend;
        let url = &url;

        self.with_bearer(move |auth| async move { backend.get_stream(url, &auth).await })
            .await
    }
}
