use super::ImageFetcher;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::sync::{Arc, Mutex};

pub struct MockImageFetcher {
    image: Arc<Mutex<Vec<u8>>>,
    fetched_urls: Arc<Mutex<Vec<Url>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockImageFetcher {
    pub fn new() -> Self {
        Self {
            // PNG signature
            image: Arc::new(Mutex::new(vec![
                0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A,
            ])),
            fetched_urls: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_image(self, bytes: Vec<u8>) -> Self {
        *self.image.lock().unwrap() = bytes;
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        self.set_failure(should_fail);
        self
    }

    pub fn set_failure(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    pub fn get_fetch_count(&self) -> usize {
        self.fetched_urls.lock().unwrap().len()
    }

    pub fn fetched_urls(&self) -> Vec<Url> {
        self.fetched_urls.lock().unwrap().clone()
    }
}

impl Default for MockImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageFetcher for MockImageFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        self.fetched_urls.lock().unwrap().push(url.clone());

        if *self.should_fail.lock().unwrap() {
            return Err(Error::AiProvider("Mock fetch failure".to_string()));
        }

        Ok(self.image.lock().unwrap().clone())
    }
}
