//! Download grant negotiation.
//!
//! A grant takes two requests: an unscoped probe that reports which
//! component types the asset offers, then a request scoped to the ones we
//! recognize.

use std::sync::Arc;

use megafetch_core::{
    ApiPortError, ComponentType, DownloadGrant, DownloadPort, DownloadRequest, FetchError,
    FetchResult, NegotiationStage,
};

/// Recognized types that are also available, in recognized order.
///
/// Available names are matched case-insensitively; unknown names are ignored.
pub fn select_components(recognized: &[ComponentType], available: &[String]) -> Vec<ComponentType> {
    let available: Vec<ComponentType> = available
        .iter()
        .filter_map(|name| name.parse().ok())
        .collect();
    recognized
        .iter()
        .copied()
        .filter(|c| available.contains(c))
        .collect()
}

/// Negotiates download grants for individual assets.
#[derive(Clone)]
pub struct GrantNegotiator {
    downloads: Arc<dyn DownloadPort>,
    component_types: Vec<ComponentType>,
    mime_type: String,
}

impl GrantNegotiator {
    pub fn new(
        downloads: Arc<dyn DownloadPort>,
        component_types: Vec<ComponentType>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            downloads,
            component_types,
            mime_type: mime_type.into(),
        }
    }

    /// Negotiate a grant for one asset.
    ///
    /// Every failure is logged here and returned as `FetchError::Negotiation`.
    pub async fn negotiate(&self, asset_id: &str) -> FetchResult<DownloadGrant> {
        let probe = self
            .downloads
            .request_download(&DownloadRequest::probe(asset_id))
            .await
            .map_err(|e| failure(asset_id, NegotiationStage::Probe, &e))?;

        let selected = select_components(&self.component_types, &probe.components);
        if selected.is_empty() {
            let err = FetchError::negotiation(
                asset_id,
                NegotiationStage::NoComponents,
                None,
                format!("none of {:?} are recognized", probe.components),
            );
            tracing::warn!(
                target: "megafetch.negotiate",
                asset_id,
                stage = %NegotiationStage::NoComponents,
                available = ?probe.components,
                "No recognized components"
            );
            return Err(err);
        }

        let request = DownloadRequest::scoped(asset_id, selected, self.mime_type.clone());
        let ticket = self
            .downloads
            .request_download(&request)
            .await
            .map_err(|e| failure(asset_id, NegotiationStage::Scoped, &e))?;

        tracing::debug!(
            target: "megafetch.negotiate",
            asset_id,
            download_id = %ticket.download_id,
            "Grant issued"
        );

        if ticket.asset_id != asset_id {
            tracing::debug!(
                target: "megafetch.negotiate",
                asset_id,
                granted = %ticket.asset_id,
                "Grant names a different asset"
            );
        }

        Ok(DownloadGrant {
            transfer_url: self.downloads.transfer_url(&ticket.download_id),
            download_id: ticket.download_id,
            asset_id: ticket.asset_id,
        })
    }
}

fn failure(asset_id: &str, stage: NegotiationStage, error: &ApiPortError) -> FetchError {
    tracing::warn!(
        target: "megafetch.negotiate",
        asset_id,
        stage = %stage,
        status = ?error.status_code(),
        error = %error,
        "Negotiation failed"
    );
    FetchError::negotiation(asset_id, stage, error.status_code(), error.to_string())
}
