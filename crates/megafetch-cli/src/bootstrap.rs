//! Composition root: builds the API client and pipeline for one run.

use std::sync::Arc;

use anyhow::Context;
use megafetch_api::{ApiClientConfig, DefaultApiClient};
use megafetch_core::RunSummary;
use megafetch_download::{FetchPipeline, PipelineDeps};
use tokio_util::sync::CancellationToken;

use crate::parser::Cli;

/// Build the production pipeline for the parsed arguments.
pub fn build_pipeline(cli: &Cli) -> anyhow::Result<FetchPipeline> {
    let client =
        DefaultApiClient::new(&ApiClientConfig::new()).context("Failed to build API client")?;
    Ok(FetchPipeline::new(
        PipelineDeps::from_client(Arc::new(client)),
        cli.fetch_config(),
        cli.credentials(),
    ))
}

/// Prepare the download directory and run one batch.
pub async fn run(cli: &Cli, cancel: CancellationToken) -> anyhow::Result<RunSummary> {
    tokio::fs::create_dir_all(&cli.download_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create download directory {}",
                cli.download_dir.display()
            )
        })?;

    let pipeline = build_pipeline(cli)?;
    let summary = pipeline.run(cancel).await?;
    Ok(summary)
}
