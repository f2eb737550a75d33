//! In-memory port fakes shared by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use megafetch_core::{
    ApiPortError, ApiPortResult, AssetPage, AssetRef, ByteStream, CatalogPort, DownloadPort,
    DownloadRequest, DownloadTicket,
};

/// Catalog serving fixed pages and per-asset categories.
#[derive(Default)]
pub struct FakeCatalog {
    pages: Vec<Vec<String>>,
    categories: HashMap<String, Vec<String>>,
    failing_pages: HashMap<u32, ApiPortError>,
    reported_pages: HashMap<u32, u32>,
    page_requests: Mutex<Vec<u32>>,
    last_query: Mutex<Option<(String, u32)>>,
    detail_requests: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn paged(pages: &[&[&str]]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|page| page.iter().map(|id| (*id).to_string()).collect())
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_categories(mut self, asset_id: &str, categories: &[&str]) -> Self {
        self.categories.insert(
            asset_id.to_string(),
            categories.iter().map(|c| (*c).to_string()).collect(),
        );
        self
    }

    pub fn failing_page(mut self, page: u32, error: ApiPortError) -> Self {
        self.failing_pages.insert(page, error);
        self
    }

    /// Make `page` report a different total page count.
    pub fn reporting_pages(mut self, page: u32, pages: u32) -> Self {
        self.reported_pages.insert(page, pages);
        self
    }

    pub fn page_requests(&self) -> Vec<u32> {
        self.page_requests.lock().unwrap().clone()
    }

    pub fn last_query(&self) -> Option<(String, u32)> {
        self.last_query.lock().unwrap().clone()
    }

    pub fn detail_requests(&self) -> Vec<String> {
        self.detail_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogPort for FakeCatalog {
    async fn list_page(&self, asset_type: &str, limit: u32, page: u32) -> ApiPortResult<AssetPage> {
        self.page_requests.lock().unwrap().push(page);
        *self.last_query.lock().unwrap() = Some((asset_type.to_string(), limit));

        if let Some(error) = self.failing_pages.get(&page) {
            return Err(error.clone());
        }
        let index = usize::try_from(page).unwrap() - 1;
        Ok(AssetPage {
            asset_ids: self.pages.get(index).cloned().unwrap_or_default(),
            pages: self
                .reported_pages
                .get(&page)
                .copied()
                .unwrap_or_else(|| u32::try_from(self.pages.len()).unwrap()),
        })
    }

    async fn asset_detail(&self, asset_id: &str) -> ApiPortResult<AssetRef> {
        self.detail_requests
            .lock()
            .unwrap()
            .push(asset_id.to_string());
        self.categories
            .get(asset_id)
            .map(|c| AssetRef::new(asset_id, c.clone()))
            .ok_or_else(|| ApiPortError::NotFound {
                resource: format!("assets/{asset_id}"),
            })
    }
}

/// What `open_transfer` serves for a download ID.
#[derive(Clone)]
pub enum FakeBody {
    Chunks(Vec<Bytes>),
    /// Serve the chunks, then fail mid-stream.
    FailAfter(Vec<Bytes>, ApiPortError),
    /// Serve the chunks, then never finish.
    Stall(Vec<Bytes>),
    /// Reject the transfer request itself.
    Reject(ApiPortError),
}

impl FakeBody {
    pub fn bytes(data: &[u8]) -> Self {
        Self::Chunks(vec![Bytes::copy_from_slice(data)])
    }
}

/// Download service issuing grants named `dl-{asset_id}`.
#[derive(Default)]
pub struct FakeDownloads {
    components: HashMap<String, Vec<String>>,
    failing_probes: HashMap<String, ApiPortError>,
    failing_scoped: HashMap<String, ApiPortError>,
    bodies: HashMap<String, FakeBody>,
    granted_assets: HashMap<String, String>,
    requests: Mutex<Vec<DownloadRequest>>,
    opened: Mutex<Vec<String>>,
}

impl FakeDownloads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_components(mut self, asset_id: &str, components: &[&str]) -> Self {
        self.components.insert(
            asset_id.to_string(),
            components.iter().map(|c| (*c).to_string()).collect(),
        );
        self
    }

    pub fn failing_probe(mut self, asset_id: &str, error: ApiPortError) -> Self {
        self.failing_probes.insert(asset_id.to_string(), error);
        self
    }

    pub fn failing_scoped(mut self, asset_id: &str, error: ApiPortError) -> Self {
        self.failing_scoped.insert(asset_id.to_string(), error);
        self
    }

    /// Answer scoped requests for `asset_id` with a different asset name.
    pub fn with_granted_asset(mut self, asset_id: &str, granted: &str) -> Self {
        self.granted_assets
            .insert(asset_id.to_string(), granted.to_string());
        self
    }

    pub fn with_body(mut self, download_id: &str, body: FakeBody) -> Self {
        self.bodies.insert(download_id.to_string(), body);
        self
    }

    pub fn requests(&self) -> Vec<DownloadRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadPort for FakeDownloads {
    async fn request_download(&self, request: &DownloadRequest) -> ApiPortResult<DownloadTicket> {
        self.requests.lock().unwrap().push(request.clone());
        let asset_id = &request.asset_id;

        let failing = if request.is_probe() {
            &self.failing_probes
        } else {
            &self.failing_scoped
        };
        if let Some(error) = failing.get(asset_id) {
            return Err(error.clone());
        }

        let (components, granted) = match &request.components {
            None => (
                self.components.get(asset_id).cloned().unwrap_or_default(),
                asset_id.clone(),
            ),
            Some(selected) => (
                selected.iter().map(|c| c.as_str().to_string()).collect(),
                self.granted_assets
                    .get(asset_id)
                    .cloned()
                    .unwrap_or_else(|| asset_id.clone()),
            ),
        };
        Ok(DownloadTicket {
            download_id: format!("dl-{asset_id}"),
            asset_id: granted,
            components,
        })
    }

    fn transfer_url(&self, download_id: &str) -> String {
        format!("fake://download/{download_id}")
    }

    async fn open_transfer(&self, transfer_url: &str) -> ApiPortResult<ByteStream> {
        self.opened.lock().unwrap().push(transfer_url.to_string());
        let download_id = transfer_url.trim_start_matches("fake://download/");
        let body = self
            .bodies
            .get(download_id)
            .cloned()
            .unwrap_or_else(|| FakeBody::bytes(format!("archive:{download_id}").as_bytes()));

        let stream = match body {
            FakeBody::Chunks(chunks) => futures::stream::iter(chunks.into_iter().map(Ok)).boxed(),
            FakeBody::FailAfter(chunks, error) => futures::stream::iter(
                chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(error))),
            )
            .boxed(),
            FakeBody::Stall(chunks) => futures::stream::iter(chunks.into_iter().map(Ok))
                .chain(futures::stream::pending())
                .boxed(),
            FakeBody::Reject(error) => return Err(error),
        };
        Ok(stream)
    }
}
