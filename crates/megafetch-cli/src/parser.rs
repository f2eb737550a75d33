//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use megafetch_core::{
    Credentials, DEFAULT_ASSET_TYPE, DEFAULT_MIME_TYPE, DEFAULT_PAGE_SIZE, FetchConfig,
};

/// Bulk-download Megascans assets into a directory.
///
/// Re-running against the same directory resumes: archives already on disk
/// and assets logged as succeeded are skipped.
#[derive(Parser)]
#[command(name = "megafetch")]
#[command(about = "Bulk-download Megascans assets", version)]
pub struct Cli {
    /// Directory receiving the archives and download_log.json (created if missing)
    pub download_dir: PathBuf,

    /// Asset type to enumerate
    #[arg(long, default_value = DEFAULT_ASSET_TYPE)]
    pub asset_type: String,

    /// Maximum concurrent transfers
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Listing page size
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Comma-separated priority categories, replacing the built-in list
    #[arg(long, value_delimiter = ',')]
    pub categories: Option<Vec<String>>,

    /// Mime type requested for every component
    #[arg(long, default_value = DEFAULT_MIME_TYPE)]
    pub mime_type: String,

    #[arg(long, env = "MEGASCANS_USERNAME")]
    pub username: String,

    #[arg(long, env = "MEGASCANS_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Developer application key
    #[arg(long, env = "MEGASCANS_APP_KEY", hide_env_values = true)]
    pub app_key: String,

    /// Developer application ID
    #[arg(long, env = "MEGASCANS_APP_ID")]
    pub app_id: String,

    /// Enable debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Pipeline configuration from the parsed flags.
    pub fn fetch_config(&self) -> FetchConfig {
        let config = FetchConfig::new(&self.download_dir)
            .with_asset_type(&self.asset_type)
            .with_max_concurrent(self.concurrency)
            .with_page_size(self.page_size)
            .with_mime_type(&self.mime_type);
        match &self.categories {
            Some(categories) => config.with_priority_categories(categories),
            None => config,
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password, &self.app_key, &self.app_id)
    }
}
