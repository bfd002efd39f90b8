use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use booklens_google_books::{FixtureVolumes, GoogleBooksClient, GoogleBooksError, Volumes};
use booklens_kernel::settings::UpstreamSettings;

/// Where result pages come from. One call is one page for a fully built query.
#[async_trait]
pub trait BookSource: Send + Sync + 'static {
    async fn fetch_page(&self, query: &str) -> Result<Volumes, GoogleBooksError>;
}

#[async_trait]
impl BookSource for GoogleBooksClient {
    async fn fetch_page(&self, query: &str) -> Result<Volumes, GoogleBooksError> {
        self.volumes(query).await
    }
}

#[async_trait]
impl BookSource for FixtureVolumes {
    async fn fetch_page(&self, query: &str) -> Result<Volumes, GoogleBooksError> {
        tracing::info!(query, "serving recorded Google Books response");
        Ok(self.volumes(query))
    }
}

/// Fixture-backed when `fixture_dir` is set, live otherwise.
pub fn from_settings(upstream: &UpstreamSettings) -> anyhow::Result<Arc<dyn BookSource>> {
    if let Some(dir) = &upstream.fixture_dir {
        let fixtures = FixtureVolumes::load(dir)
            .with_context(|| format!("failed to load fixtures from {}", dir.display()))?;
        return Ok(Arc::new(fixtures));
    }

    let client = GoogleBooksClient::with_timeout(Duration::from_millis(upstream.fetch_timeout_ms))
        .context("failed to build Google Books HTTP client")?
        .with_base_url(upstream.base_url.clone());
    Ok(Arc::new(client))
}
