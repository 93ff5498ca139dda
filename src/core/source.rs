//! Catalog data sources
//!
//! A source only answers "give me every video"; ranking and filtering
//! live in the catalog store.

use crate::error::{Result, StreamVistaError};
use crate::types::{Config, Video};
use std::future::Future;
use tracing::debug;

const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.json");

/// Supplier of the full, immutable video list
pub trait CatalogSource: Send + Sync {
    fn fetch_videos(&self) -> impl Future<Output = Result<Vec<Video>>> + Send;
}

/// The dataset compiled into the binary
#[derive(Debug, Clone)]
pub struct StaticSource {
    videos: Vec<Video>,
}

impl StaticSource {
    /// Parse the bundled catalog
    pub fn bundled() -> Result<Self> {
        let videos: Vec<Video> = serde_json::from_str(BUNDLED_CATALOG)?;
        Ok(Self { videos })
    }

    pub fn from_videos(videos: Vec<Video>) -> Self {
        Self { videos }
    }
}

impl CatalogSource for StaticSource {
    async fn fetch_videos(&self) -> Result<Vec<Video>> {
        Ok(self.videos.clone())
    }
}

/// Catalog served as a JSON array over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl CatalogSource for HttpSource {
    async fn fetch_videos(&self) -> Result<Vec<Video>> {
        debug!(url = %self.url, "fetching remote catalog");
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StreamVistaError::Retrieval(format!(
                "HTTP {}: {}",
                response.status(),
                self.url
            )));
        }

        Ok(response.json().await?)
    }
}

/// The source named by the configuration: remote when `catalog_url` is set
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Static(StaticSource),
    Http(HttpSource),
}

impl ConfiguredSource {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(match &config.catalog_url {
            Some(url) => Self::Http(HttpSource::new(url.clone())),
            None => Self::Static(StaticSource::bundled()?),
        })
    }
}

impl CatalogSource for ConfiguredSource {
    async fn fetch_videos(&self) -> Result<Vec<Video>> {
        match self {
            Self::Static(source) => source.fetch_videos().await,
            Self::Http(source) => source.fetch_videos().await,
        }
    }
}
