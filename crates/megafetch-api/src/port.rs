//! Port trait implementations for `ApiClient`.
//!
//! Implements the core-owned session, catalog and download ports, converting
//! between internal wire types and core DTOs.

use async_trait::async_trait;
use futures::StreamExt;
use megafetch_core::{
    ApiPortError, ApiPortResult, AssetPage, AssetRef, ByteStream, CatalogPort, Credentials,
    DownloadPort, DownloadRequest, DownloadTicket, Session, SessionPort,
};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::HttpBackend;
use crate::models::{ComponentSpec, DownloadRequestBody, DownloadResponse};

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `ApiError` to core `ApiPortError`.
fn map_error(err: ApiError) -> ApiPortError {
    match err {
        ApiError::ApiRequestFailed {
            status,
            url,
            message,
        } => match status {
            401 => ApiPortError::Unauthorized { message },
            404 => ApiPortError::NotFound { resource: url },
            429 => ApiPortError::RateLimited,
            _ => ApiPortError::Status { status, message },
        },
        ApiError::InvalidResponse { message } => ApiPortError::InvalidResponse { message },
        ApiError::NotAuthenticated { message } => ApiPortError::Unauthorized { message },
        ApiError::Network(e) => {
            let message = if e.is_timeout() {
                format!("request timed out: {e}")
            } else {
                e.to_string()
            };
            ApiPortError::Network { message }
        }
        ApiError::InvalidUrl(e) => ApiPortError::Configuration {
            message: e.to_string(),
        },
        ApiError::JsonParse(e) => ApiPortError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

// ============================================================================
// Type Conversions
// ============================================================================

fn to_request_body(request: &DownloadRequest) -> DownloadRequestBody {
    DownloadRequestBody {
        asset: request.asset_id.clone(),
        components: request.components.as_ref().map(|components| {
            components
                .iter()
                .map(|c| ComponentSpec {
                    component_type: c.as_str().to_string(),
                    mime_type: Some(request.mime_type.clone()),
                })
                .collect()
        }),
    }
}

fn to_ticket(response: DownloadResponse, requested_asset: &str) -> DownloadTicket {
    DownloadTicket {
        download_id: response.id,
        asset_id: response
            .asset
            .filter(|asset| !asset.is_empty())
            .unwrap_or_else(|| requested_asset.to_string()),
        components: response
            .components
            .into_iter()
            .map(|c| c.component_type)
            .collect(),
    }
}

// ============================================================================
// Port Implementations
// ============================================================================

#[async_trait]
impl<B: HttpBackend> SessionPort for ApiClient<B> {
    async fn authenticate(&self, credentials: &Credentials) -> ApiPortResult<Session> {
        Self::authenticate(self, credentials).await.map_err(map_error)
    }

    async fn reauthenticate(&self) -> ApiPortResult<Session> {
        Self::reauthenticate(self).await.map_err(map_error)
    }
}

#[async_trait]
impl<B: HttpBackend> CatalogPort for ApiClient<B> {
    async fn list_page(
        &self,
        asset_type: &str,
        limit: u32,
        page: u32,
    ) -> ApiPortResult<AssetPage> {
        let response = self
            .list_assets(asset_type, limit, page)
            .await
            .map_err(map_error)?;
        Ok(AssetPage {
            asset_ids: response.assets.into_iter().map(|a| a.id).collect(),
            pages: response.pages,
        })
    }

    async fn asset_detail(&self, asset_id: &str) -> ApiPortResult<AssetRef> {
        let detail = Self::asset_detail(self, asset_id)
            .await
            .map_err(map_error)?;
        Ok(AssetRef::new(asset_id, detail.categories))
    }
}

#[async_trait]
impl<B: HttpBackend> DownloadPort for ApiClient<B> {
    async fn request_download(&self, request: &DownloadRequest) -> ApiPortResult<DownloadTicket> {
        let body = to_request_body(request);
        let response = Self::request_download(self, &body)
            .await
            .map_err(map_error)?;
        Ok(to_ticket(response, &request.asset_id))
    }

    fn transfer_url(&self, download_id: &str) -> String {
        Self::transfer_url(self, download_id).to_string()
    }

    async fn open_transfer(&self, transfer_url: &str) -> ApiPortResult<ByteStream> {
        let stream = Self::open_transfer(self, transfer_url)
            .await
            .map_err(map_error)?;
        Ok(stream.map(|chunk| chunk.map_err(map_error)).boxed())
    }
}
