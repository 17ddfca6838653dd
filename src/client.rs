//! Prompt forwarding client.

use crate::ai::{AiTransport, AzureOpenAiTransport};
use crate::image::{CacheOption, HttpImageFetcher, ImageFetcher, LazyImage};
use crate::models::{ChatRequest, ChatResponse, ClientConfig, ImageRequest};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Forwards chat prompts and location image requests to a hosted AI provider.
///
/// The configuration is fixed at construction. Every call builds its own
/// request, so one client can be shared across tasks.
pub struct PromptClient {
    config: ClientConfig,
    transport: Option<Arc<dyn AiTransport>>,
    fetcher: Arc<dyn ImageFetcher>,
}

impl PromptClient {
    /// Build a client backed by Azure OpenAI. An unconfigured `config` yields
    /// an inert client that never touches the network.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        // Shared by the transport and the image fetcher.
        let http_client = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let transport: Option<Arc<dyn AiTransport>> =
            match (&config.endpoint, &config.credential) {
                (Some(endpoint), Some(credential)) if config.is_configured() => {
                    info!(
                        "AI provider: Azure OpenAI at {} (chat: {}, image: {})",
                        endpoint, config.chat_deployment, config.image_deployment
                    );
                    Some(Arc::new(AzureOpenAiTransport::new_with_client(
                        http_client.clone(),
                        endpoint.clone(),
                        credential.clone(),
                        config.api_version.clone(),
                    )))
                }
                _ => {
                    info!("AI provider not configured; prompt client is inert");
                    None
                }
            };

        Ok(Self {
            config,
            transport,
            fetcher: Arc::new(HttpImageFetcher::new_with_client(http_client)),
        })
    }

    /// Build a client from concrete service dependencies.
    ///
    /// The configuration guard still applies: with an unconfigured `config`
    /// the transport is never called.
    pub fn with_services(
        config: ClientConfig,
        transport: Arc<dyn AiTransport>,
        fetcher: Arc<dyn ImageFetcher>,
    ) -> Self {
        Self {
            config,
            transport: Some(transport),
            fetcher,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured() && self.transport.is_some()
    }

    fn transport(&self) -> Result<&dyn AiTransport> {
        match &self.transport {
            Some(transport) if self.config.is_configured() => Ok(transport.as_ref()),
            _ => Err(Error::NotConfigured),
        }
    }

    /// Ask the chat deployment a question, returning `""` on any failure.
    ///
    /// An unconfigured client returns `""` without a network call. Failures
    /// are logged but indistinguishable from an empty answer; use
    /// [`chat`](Self::chat) to tell them apart.
    pub async fn get_chat_response(&self, user_prompt: &str) -> String {
        match self.chat(user_prompt).await {
            Ok(text) => text,
            Err(Error::NotConfigured) => {
                debug!("Chat skipped: client not configured");
                String::new()
            }
            Err(e) => {
                warn!("Chat request failed, returning empty response: {}", e);
                String::new()
            }
        }
    }

    /// Ask the chat deployment a question with the fixed predictive-analytics
    /// system prompt and sampling parameters.
    pub async fn chat(&self, user_prompt: &str) -> Result<String> {
        let request = ChatRequest::predictive(&self.config.chat_deployment, user_prompt);
        Ok(self.send_chat(&request).await?.text)
    }

    pub async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let transport = self.transport()?;
        debug!("Sending chat request to deployment {}", request.deployment);
        transport.send_chat(request).await
    }

    /// Generate a picture of `location_name`.
    ///
    /// The returned handle fetches nothing until first loaded and keeps the
    /// bytes afterwards. Fails with [`Error::NotConfigured`] on an
    /// unconfigured client.
    pub async fn get_image(&self, location_name: &str) -> Result<LazyImage> {
        let request = ImageRequest::for_location(&self.config.image_deployment, location_name);
        self.image(&request, CacheOption::OnLoad).await
    }

    pub async fn image(&self, request: &ImageRequest, cache: CacheOption) -> Result<LazyImage> {
        let transport = self.transport()?;
        debug!("Sending image request to deployment {}", request.deployment);
        let result = transport.generate_image(request).await?;
        if let Some(revised) = &result.revised_prompt {
            debug!("Provider revised image prompt to: {}", revised);
        }
        Ok(LazyImage::new(result.source, self.fetcher.clone(), cache))
    }
}
