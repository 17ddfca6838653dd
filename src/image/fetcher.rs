use super::ImageFetcher;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};

/// Downloads image bytes with a plain GET.
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new_with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            tracing::error!("Failed to fetch image from {}: {}", url, e);
            e
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Image fetch failed (status {}): {}", status, url);
            return Err(Error::AiProvider(format!(
                "Image fetch failed (status {}): {}",
                status, url
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
