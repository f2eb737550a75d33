//! Pipeline configuration.
//!
//! Contains the paths, limits and policies the fetch pipeline needs.
//! Remote endpoints and HTTP behavior are configured on the API client.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use crate::domain::ComponentType;

/// Asset type enumerated when none is given.
pub const DEFAULT_ASSET_TYPE: &str = "surface";

/// Listing page size.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Mime type requested for every component.
pub const DEFAULT_MIME_TYPE: &str = "image/x-exr";

/// File name of the completion ledger inside the download directory.
pub const LEDGER_FILE_NAME: &str = "download_log.json";

const DEFAULT_PRIORITY_CATEGORIES: [&str; 10] = [
    "bark", "debris", "grass", "gravel", "ground", "moss", "rock", "sand", "snow", "soil",
];

/// Configuration for a fetch pipeline run.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Directory receiving archives and the ledger.
    pub download_dir: PathBuf,
    /// Asset type passed to the listing endpoint.
    pub asset_type: String,
    /// Listing page size.
    pub page_size: u32,
    /// Maximum concurrent transfers.
    pub max_concurrent: usize,
    /// Lowercased priority categories.
    pub priority_categories: BTreeSet<String>,
    /// Component types requested, in request order.
    pub component_types: Vec<ComponentType>,
    /// Mime type attached to every requested component.
    pub mime_type: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("."),
            asset_type: DEFAULT_ASSET_TYPE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_concurrent: 4,
            priority_categories: DEFAULT_PRIORITY_CATEGORIES
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
            component_types: ComponentType::ALL.to_vec(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
        }
    }
}

impl FetchConfig {
    /// Create a new config for the download directory.
    #[must_use]
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            download_dir: download_dir.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_asset_type(mut self, asset_type: impl Into<String>) -> Self {
        self.asset_type = asset_type.into();
        self
    }

    /// Set the listing page size (clamped to at least 1).
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the worker pool size (clamped to at least 1).
    #[must_use]
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    /// Replace the priority allow-list. Categories are compared lowercased.
    #[must_use]
    pub fn with_priority_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.priority_categories = categories
            .into_iter()
            .map(|c| c.as_ref().trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();
        self
    }

    #[must_use]
    pub fn with_component_types(mut self, components: Vec<ComponentType>) -> Self {
        self.component_types = components;
        self
    }

    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Path of the completion ledger.
    pub fn ledger_path(&self) -> PathBuf {
        self.download_dir.join(LEDGER_FILE_NAME)
    }

    /// Deterministic path of an asset's archive.
    pub fn artifact_path(&self, asset_id: &str) -> PathBuf {
        artifact_path(&self.download_dir, asset_id)
    }
}

/// Whether an asset ID can name a file directly inside the download
/// directory: a single normal path component with no separators.
pub fn is_plain_asset_id(asset_id: &str) -> bool {
    if asset_id.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(asset_id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// `{download_dir}/{asset_id}.zip`.
///
/// Callers must check [`is_plain_asset_id`] first; remote IDs are untrusted.
pub fn artifact_path(download_dir: &Path, asset_id: &str) -> PathBuf {
    download_dir.join(format!("{asset_id}.zip"))
}
