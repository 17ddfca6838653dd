//! Lazily loaded image handles
//!
//! A [`LazyImage`] wraps the source of a generated image. Nothing is fetched
//! until the bytes are first asked for; with [`CacheOption::OnLoad`] the
//! fetched bytes are kept for the lifetime of the handle.

pub mod fetcher;
pub mod mock;

pub use fetcher::HttpImageFetcher;
pub use mock::MockImageFetcher;

use crate::models::ImageSource;
use crate::Result;
use async_trait::async_trait;
use reqwest::Url;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;

#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Retention policy for fetched image bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheOption {
    /// Fetch once, keep the bytes.
    #[default]
    OnLoad,
    /// Fetch on every access.
    Never,
}

pub struct LazyImage {
    source: ImageSource,
    cache: CacheOption,
    fetcher: Arc<dyn ImageFetcher>,
    cached: OnceCell<Arc<[u8]>>,
}

impl LazyImage {
    pub fn new(source: ImageSource, fetcher: Arc<dyn ImageFetcher>, cache: CacheOption) -> Self {
        let cached = match &source {
            ImageSource::Inline(bytes) => OnceCell::from(Arc::<[u8]>::from(bytes.as_slice())),
            ImageSource::Url(_) => OnceCell::new(),
        };
        Self {
            source,
            cache,
            fetcher,
            cached,
        }
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn source_uri(&self) -> Option<&Url> {
        match &self.source {
            ImageSource::Url(url) => Some(url),
            ImageSource::Inline(_) => None,
        }
    }

    pub fn cache_option(&self) -> CacheOption {
        self.cache
    }

    /// True once bytes are held by the handle. Inline images always are.
    pub fn is_loaded(&self) -> bool {
        self.cached.initialized()
    }

    /// Image bytes, fetching them on first access.
    pub async fn load(&self) -> Result<Arc<[u8]>> {
        let url = match &self.source {
            ImageSource::Url(url) => url,
            ImageSource::Inline(bytes) => {
                return Ok(self
                    .cached
                    .get()
                    .cloned()
                    .unwrap_or_else(|| Arc::from(bytes.as_slice())));
            }
        };

        match self.cache {
            CacheOption::OnLoad => {
                let bytes = self
                    .cached
                    .get_or_try_init(|| async {
                        tracing::debug!("Fetching image from {}", url);
                        self.fetcher.fetch(url).await.map(Arc::from)
                    })
                    .await?;
                Ok(bytes.clone())
            }
            CacheOption::Never => {
                tracing::debug!("Fetching uncached image from {}", url);
                Ok(Arc::from(self.fetcher.fetch(url).await?))
            }
        }
    }

    /// MIME type sniffed from the image bytes, if the format is recognized.
    pub async fn mime_type(&self) -> Result<Option<&'static str>> {
        let bytes = self.load().await?;
        Ok(image::guess_format(&bytes)
            .ok()
            .map(|format| format.to_mime_type()))
    }

    pub async fn decode(&self) -> Result<image::DynamicImage> {
        let bytes = self.load().await?;
        Ok(image::load_from_memory(&bytes)?)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.load().await?;
        tokio::fs::write(path, &bytes[..]).await?;
        tracing::info!("Saved image to {}", path.display());
        Ok(())
    }
}

impl fmt::Debug for LazyImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            ImageSource::Url(url) => url.as_str().to_string(),
            ImageSource::Inline(bytes) => format!("<{} inline bytes>", bytes.len()),
        };
        f.debug_struct("LazyImage")
            .field("source", &source)
            .field("cache", &self.cache)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
