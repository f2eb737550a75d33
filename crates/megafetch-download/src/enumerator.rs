//! Catalog enumeration.
//!
//! Walks the paginated listing for one asset type and yields asset IDs in
//! server order. Page 1 doubles as the probe that reports the page count.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use megafetch_core::{CatalogPort, FetchError, FetchResult};

/// Produces restartable asset ID sequences for an asset type.
#[derive(Clone)]
pub struct CatalogEnumerator {
    catalog: Arc<dyn CatalogPort>,
    page_size: u32,
}

impl CatalogEnumerator {
    pub fn new(catalog: Arc<dyn CatalogPort>, page_size: u32) -> Self {
        Self {
            catalog,
            page_size: page_size.max(1),
        }
    }

    /// Start a fresh walk over every asset of `asset_type`.
    pub fn list_asset_ids(&self, asset_type: &str) -> AssetIds {
        AssetIds {
            catalog: Arc::clone(&self.catalog),
            asset_type: asset_type.to_string(),
            page_size: self.page_size,
            next_page: 1,
            total_pages: None,
            buffer: VecDeque::new(),
            seen: HashSet::new(),
            done: false,
        }
    }
}

/// Lazy, finite sequence of asset IDs.
///
/// Pages are fetched on demand. IDs repeated across pages are yielded once.
/// After an error the sequence is fused and yields `None`.
pub struct AssetIds {
    catalog: Arc<dyn CatalogPort>,
    asset_type: String,
    page_size: u32,
    next_page: u32,
    total_pages: Option<u32>,
    buffer: VecDeque<String>,
    seen: HashSet<String>,
    done: bool,
}

impl AssetIds {
    /// Yield the next asset ID, fetching the next page when needed.
    pub async fn next(&mut self) -> Option<FetchResult<String>> {
        loop {
            if let Some(id) = self.buffer.pop_front() {
                return Some(Ok(id));
            }
            if self.done {
                return None;
            }
            if let Some(total) = self.total_pages {
                if self.next_page > total {
                    self.done = true;
                    return None;
                }
            }
            if let Err(e) = self.fetch_next_page().await {
                self.done = true;
                self.buffer.clear();
                return Some(Err(e));
            }
        }
    }

    /// Rewind to page 1. Already-yielded IDs will be yielded again.
    pub fn restart(&mut self) {
        self.next_page = 1;
        self.total_pages = None;
        self.buffer.clear();
        self.seen.clear();
        self.done = false;
    }

    /// Page count reported by the first page, once fetched.
    pub const fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    async fn fetch_next_page(&mut self) -> FetchResult<()> {
        let page = self.next_page;
        let listing = self
            .catalog
            .list_page(&self.asset_type, self.page_size, page)
            .await
            .map_err(|e| {
                tracing::error!(
                    target: "megafetch.enumerate",
                    asset_type = %self.asset_type,
                    page,
                    status = ?e.status_code(),
                    error = %e,
                    "Listing page failed"
                );
                FetchError::enumeration(&self.asset_type, page, e.to_string())
            })?;

        let total = *self.total_pages.get_or_insert(listing.pages);
        self.next_page += 1;

        if listing.pages != total {
            tracing::debug!(
                target: "megafetch.enumerate",
                asset_type = %self.asset_type,
                page,
                reported = listing.pages,
                expected = total,
                "Page count changed since page 1"
            );
        }

        if total == 0 {
            tracing::info!(
                target: "megafetch.enumerate",
                asset_type = %self.asset_type,
                "Catalog is empty"
            );
            self.done = true;
            return Ok(());
        }

        let count = listing.asset_ids.len();
        for id in listing.asset_ids {
            if self.seen.insert(id.clone()) {
                self.buffer.push_back(id);
            }
        }

        tracing::info!(
            target: "megafetch.enumerate",
            asset_type = %self.asset_type,
            count,
            "page {page} of {total}"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCatalog;
    use megafetch_core::ApiPortError;

    async fn collect(ids: &mut AssetIds) -> Vec<FetchResult<String>> {
        let mut out = Vec::new();
        while let Some(item) = ids.next().await {
            out.push(item);
        }
        out
    }

    fn ok_ids(items: Vec<FetchResult<String>>) -> Vec<String> {
        items.into_iter().map(Result::unwrap).collect()
    }

    #[tokio::test]
    async fn test_walks_pages_in_order() {
        let catalog = Arc::new(FakeCatalog::paged(&[&["a", "b"], &["c", "d"], &["e"]]));
        let enumerator = CatalogEnumerator::new(catalog.clone(), 2);

        let mut ids = enumerator.list_asset_ids("surface");
        let items = collect(&mut ids).await;

        assert_eq!(ok_ids(items), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(ids.total_pages(), Some(3));
        // Page 1 is requested once, not re-fetched after the probe.
        assert_eq!(catalog.page_requests(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_page_count_from_first_page_governs() {
        let catalog = Arc::new(
            FakeCatalog::paged(&[&["a"], &["b"], &["c"]])
                .reporting_pages(2, 1)
                .reporting_pages(3, 5),
        );
        let mut ids = CatalogEnumerator::new(catalog.clone(), 1).list_asset_ids("surface");

        assert_eq!(ok_ids(collect(&mut ids).await), vec!["a", "b", "c"]);
        assert_eq!(ids.total_pages(), Some(3));
        assert_eq!(catalog.page_requests(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_catalog_yields_nothing() {
        let catalog = Arc::new(FakeCatalog::paged(&[]));
        let mut ids = CatalogEnumerator::new(catalog.clone(), 200).list_asset_ids("surface");

        assert!(ids.next().await.is_none());
        assert!(ids.next().await.is_none());
        assert_eq!(catalog.page_requests(), vec![1]);
    }

    #[tokio::test]
    async fn test_tolerates_empty_pages_and_dedupes() {
        let catalog = Arc::new(FakeCatalog::paged(&[&["a", "b"], &[], &["b", "c"], &[]]));
        let mut ids = CatalogEnumerator::new(catalog, 2).list_asset_ids("surface");

        assert_eq!(ok_ids(collect(&mut ids).await), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failed_page_reports_page_and_fuses() {
        let catalog = Arc::new(
            FakeCatalog::paged(&[&["a"], &["b"], &["c"]]).failing_page(
                2,
                ApiPortError::Status {
                    status: 503,
                    message: "unavailable".to_string(),
                },
            ),
        );
        let mut ids = CatalogEnumerator::new(catalog.clone(), 1).list_asset_ids("surface");

        assert_eq!(ids.next().await, Some(Ok("a".to_string())));
        let err = ids.next().await.unwrap().unwrap_err();
        assert!(matches!(err, FetchError::Enumeration { page: 2, .. }));
        assert!(ids.next().await.is_none());
        assert_eq!(catalog.page_requests(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_restart_begins_at_page_one() {
        let catalog = Arc::new(FakeCatalog::paged(&[&["a"], &["b"]]));
        let mut ids = CatalogEnumerator::new(catalog.clone(), 1).list_asset_ids("surface");

        assert_eq!(ids.next().await, Some(Ok("a".to_string())));
        ids.restart();
        assert_eq!(ok_ids(collect(&mut ids).await), vec!["a", "b"]);
        assert_eq!(catalog.page_requests(), vec![1, 1, 2]);
    }

    #[tokio::test]
    async fn test_passes_type_and_page_size() {
        let catalog = Arc::new(FakeCatalog::paged(&[&["a"]]));
        let mut ids = CatalogEnumerator::new(catalog.clone(), 200).list_asset_ids("3d");
        collect(&mut ids).await;

        assert_eq!(catalog.last_query(), Some(("3d".to_string(), 200)));
    }
}
