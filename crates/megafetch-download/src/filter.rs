//! Priority filtering by asset category.

use std::collections::BTreeSet;
use std::sync::Arc;

use megafetch_core::CatalogPort;

/// Keeps assets whose categories intersect the allow-list.
///
/// Fails closed: an asset without categories, or whose detail lookup
/// fails, is excluded.
#[derive(Clone)]
pub struct PriorityFilter {
    catalog: Arc<dyn CatalogPort>,
    categories: BTreeSet<String>,
}

impl PriorityFilter {
    pub fn new<I, S>(catalog: Arc<dyn CatalogPort>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            catalog,
            categories: categories
                .into_iter()
                .map(|c| c.as_ref().trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    /// Whether the asset belongs to a priority category.
    pub async fn is_priority(&self, asset_id: &str) -> bool {
        match self.catalog.asset_detail(asset_id).await {
            Ok(asset) => {
                let keep = self.matches(&asset.categories);
                tracing::debug!(
                    target: "megafetch.filter",
                    asset_id,
                    categories = ?asset.categories,
                    keep,
                    "Filtered asset"
                );
                keep
            }
            Err(e) => {
                tracing::warn!(
                    target: "megafetch.filter",
                    asset_id,
                    status = ?e.status_code(),
                    error = %e,
                    "Asset detail lookup failed, excluding asset"
                );
                false
            }
        }
    }

    /// Case-insensitive intersection test against the allow-list.
    pub fn matches(&self, categories: &[String]) -> bool {
        categories
            .iter()
            .any(|c| self.categories.contains(&c.trim().to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use megafetch_core::{ApiPortError, ApiPortResult, AssetPage, AssetRef};
    use mockall::mock;

    mock! {
        Catalog {}

        #[async_trait::async_trait]
        impl CatalogPort for Catalog {
            async fn list_page(&self, asset_type: &str, limit: u32, page: u32) -> ApiPortResult<AssetPage>;
            async fn asset_detail(&self, asset_id: &str) -> ApiPortResult<AssetRef>;
        }
    }

    fn filter_with(catalog: MockCatalog) -> PriorityFilter {
        PriorityFilter::new(Arc::new(catalog), ["rock", "Moss", " sand "])
    }

    #[test]
    fn test_matches_case_insensitively() {
        let filter = filter_with(MockCatalog::new());
        assert!(filter.matches(&["ROCK".to_string()]));
        assert!(filter.matches(&["cliff".to_string(), "moss".to_string()]));
        assert!(filter.matches(&["Sand".to_string()]));
        assert!(!filter.matches(&["metal".to_string()]));
        assert!(!filter.matches(&[]));
    }

    #[tokio::test]
    async fn test_is_priority_uses_detail_categories() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_asset_detail()
            .withf(|id| id == "a1")
            .times(1)
            .returning(|id| Ok(AssetRef::new(id, vec!["Rock".to_string()])));
        catalog
            .expect_asset_detail()
            .withf(|id| id == "a2")
            .times(1)
            .returning(|id| Ok(AssetRef::new(id, vec!["wood".to_string()])));

        let filter = filter_with(catalog);
        assert!(filter.is_priority("a1").await);
        assert!(!filter.is_priority("a2").await);
    }

    #[tokio::test]
    async fn test_missing_categories_excluded() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_asset_detail()
            .returning(|id| Ok(AssetRef::new(id, Vec::new())));

        assert!(!filter_with(catalog).is_priority("a1").await);
    }

    #[tokio::test]
    async fn test_failed_lookup_fails_closed() {
        let mut catalog = MockCatalog::new();
        catalog.expect_asset_detail().returning(|_| {
            Err(ApiPortError::Network {
                message: "connection reset".to_string(),
            })
        });

        assert!(!filter_with(catalog).is_priority("a1").await);
    }
}
