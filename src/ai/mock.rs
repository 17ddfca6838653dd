use super::AiTransport;
use crate::models::{
    ChatRequest, ChatResponse, ImageRequest, ImageResult, ImageSource,
};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::sync::{Arc, Mutex};

/// Scripted transport that records requests instead of touching the network.
pub struct MockTransport {
    chat_responses: Arc<Mutex<Vec<String>>>,
    image_urls: Arc<Mutex<Vec<Url>>>,
    chat_requests: Arc<Mutex<Vec<ChatRequest>>>,
    image_requests: Arc<Mutex<Vec<ImageRequest>>>,
    call_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            chat_responses: Arc::new(Mutex::new(Vec::new())),
            image_urls: Arc::new(Mutex::new(Vec::new())),
            chat_requests: Arc::new(Mutex::new(Vec::new())),
            image_requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_chat_response(self, response: String) -> Self {
        self.chat_responses.lock().unwrap().push(response);
        self
    }

    pub fn with_image_url(self, url: Url) -> Self {
        self.image_urls.lock().unwrap().push(url);
        self
    }

    /// Make every call fail with a provider error.
    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn image_requests(&self) -> Vec<ImageRequest> {
        self.image_requests.lock().unwrap().clone()
    }

    /// Scripted responses cycle per operation, so chat and image calls do not
    /// advance each other's position.
    fn next_index(&self, requests_seen: usize, len: usize) -> usize {
        (requests_seen - 1) % len
    }

    fn record_call(&self) -> Result<()> {
        *self.call_count.lock().unwrap() += 1;
        if *self.should_fail.lock().unwrap() {
            return Err(Error::AiProvider("Mock transport failure".to_string()));
        }
        Ok(())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiTransport for MockTransport {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.chat_requests.lock().unwrap().push(request.clone());
        self.record_call()?;

        let responses = self.chat_responses.lock().unwrap();
        let text = if responses.is_empty() {
            format!("Mock answer to: {}", request.user_prompt)
        } else {
            let seen = self.chat_requests.lock().unwrap().len();
            responses[self.next_index(seen, responses.len())].clone()
        };

        Ok(ChatResponse {
            text,
            finish_reason: Some("stop".to_string()),
        })
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageResult> {
        self.image_requests.lock().unwrap().push(request.clone());
        self.record_call()?;

        let urls = self.image_urls.lock().unwrap();
        let url = if urls.is_empty() {
            Url::parse("https://images.example.com/mock.png")
                .map_err(|e| Error::AiProvider(e.to_string()))?
        } else {
            let seen = self.image_requests.lock().unwrap().len();
            urls[self.next_index(seen, urls.len())].clone()
        };

        Ok(ImageResult {
            source: ImageSource::Url(url),
            revised_prompt: None,
        })
    }
}
