//! Where the CLI gets boundary documents: a local file, the on-disk cache,
//! or the network.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct BoundarySource {
    /// Local document; when set, nothing is fetched.
    pub input: Option<PathBuf>,
    pub url: String,
    pub cache_dir: Option<PathBuf>,
}

/// Cache file for a URL: the blake3 hash of the URL, hex encoded.
pub fn cache_path(cache_dir: &Path, url: &str) -> PathBuf {
    let key = blake3::hash(url.as_bytes()).to_hex();
    cache_dir.join(format!("{key}.json"))
}

async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    info!(url, "fetching boundaries");
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("request {url}"))?
        .error_for_status()
        .with_context(|| format!("fetch {url}"))?;
    resp.text()
        .await
        .with_context(|| format!("read body of {url}"))
}

impl BoundarySource {
    pub async fn load_text(&self, client: &Client) -> Result<String> {
        if let Some(path) = &self.input {
            debug!(path = %path.display(), "reading local boundaries");
            return tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("read {}", path.display()));
        }

        let Some(dir) = &self.cache_dir else {
            return fetch_text(client, &self.url).await;
        };

        let cached = cache_path(dir, &self.url);
        if let Ok(text) = tokio::fs::read_to_string(&cached).await {
            debug!(path = %cached.display(), "boundary cache hit");
            return Ok(text);
        }

        let text = fetch_text(client, &self.url).await?;
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create {}", dir.display()))?;
        tokio::fs::write(&cached, &text)
            .await
            .with_context(|| format!("write {}", cached.display()))?;
        info!(path = %cached.display(), bytes = text.len(), "cached boundaries");
        Ok(text)
    }
}
