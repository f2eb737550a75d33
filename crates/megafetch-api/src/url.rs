//! URL construction helpers for the Megascans API.
//!
//! Pure functions so every call site builds endpoints the same way.

use crate::models::ApiConfig;
use url::Url;

/// Append path segments to a base URL, keeping any base path.
fn join_path(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    let base_path = url.path().trim_end_matches('/').to_string();
    let suffix = segments
        .iter()
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    url.set_path(&format!("{base_path}/{suffix}"));
    url.set_query(None);
    url
}

/// `{accounts}/applications/{app_id}/tokens`
pub fn build_token_url(config: &ApiConfig, app_id: &str) -> Url {
    join_path(&config.accounts_base_url, &["applications", app_id, "tokens"])
}

/// `{api}/assets?limit=..&page=..&type=..`
pub fn build_assets_url(config: &ApiConfig, asset_type: &str, limit: u32, page: u32) -> Url {
    let mut url = join_path(&config.api_base_url, &["assets"]);
    url.set_query(Some(&format!(
        "limit={limit}&page={page}&type={}",
        urlencoding::encode(asset_type)
    )));
    url
}

/// `{api}/assets/{asset_id}`
pub fn build_asset_url(config: &ApiConfig, asset_id: &str) -> Url {
    join_path(&config.api_base_url, &["assets", asset_id])
}

/// `{api}/downloads`
pub fn build_downloads_url(config: &ApiConfig) -> Url {
    join_path(&config.api_base_url, &["downloads"])
}

/// `{transfer}/download/{download_id}?url={encoded downloads URL}`
pub fn build_transfer_url(config: &ApiConfig, download_id: &str) -> Url {
    let mut url = join_path(&config.transfer_base_url, &["download", download_id]);
    let downloads = build_downloads_url(config);
    url.set_query(Some(&format!(
        "url={}",
        urlencoding::encode(downloads.as_str())
    )));
    url
}
