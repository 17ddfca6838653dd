//! Data models and structures
//!
//! Defines client configuration and the provider-neutral request/response
//! types exchanged between [`PromptClient`](crate::PromptClient) and an
//! [`AiTransport`](crate::ai::AiTransport).

use crate::{prompts, Error, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_CHAT_DEPLOYMENT: &str = "GPT-4O";
pub const DEFAULT_IMAGE_DEPLOYMENT: &str = "DALL-E";
pub const DEFAULT_API_VERSION: &str = "2024-02-01";

/// API key for the AI provider. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: Option<Url>,
    pub credential: Option<Credential>,
    pub chat_deployment: String,
    pub image_deployment: String,
    pub api_version: String,
    /// `None` leaves the transport's default in place.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            credential: None,
            chat_deployment: DEFAULT_CHAT_DEPLOYMENT.to_string(),
            image_deployment: DEFAULT_IMAGE_DEPLOYMENT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Configuration for an endpoint and key. Empty strings leave the
    /// corresponding field unset.
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            endpoint: parse_endpoint(endpoint)?,
            credential: (!api_key.is_empty()).then(|| Credential::new(api_key)),
            ..Self::default()
        })
    }

    pub fn with_chat_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.chat_deployment = deployment.into();
        self
    }

    pub fn with_image_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.image_deployment = deployment.into();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// True when both an endpoint and a non-empty key are present.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some() && self.credential.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Load from the process environment, reading `.env` first if present.
    ///
    /// A missing endpoint or key produces an unconfigured client rather than
    /// an error.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup("AZURE_OPENAI_ENDPOINT").unwrap_or_default();
        let api_key = lookup("AZURE_OPENAI_API_KEY").unwrap_or_default();
        let mut config = Self::new(endpoint.trim(), api_key.trim())?;

        // Blank values keep the defaults, like a blank endpoint or key.
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(deployment) = non_blank("AZURE_OPENAI_CHAT_DEPLOYMENT") {
            config.chat_deployment = deployment;
        }
        if let Some(deployment) = non_blank("AZURE_OPENAI_IMAGE_DEPLOYMENT") {
            config.image_deployment = deployment;
        }
        if let Some(version) = non_blank("AZURE_OPENAI_API_VERSION") {
            config.api_version = version;
        }
        if let Some(secs) = non_blank("AI_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                Error::Config(format!("AI_REQUEST_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Option<Url>> {
    if endpoint.is_empty() {
        return Ok(None);
    }
    Url::parse(endpoint)
        .map(Some)
        .map_err(|e| Error::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))
}

/// One chat completion exchange: a system prompt, a user prompt and sampling
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub deployment: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Nucleus sampling factor.
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl ChatRequest {
    /// The fixed predictive-analytics request used by
    /// [`PromptClient::get_chat_response`](crate::PromptClient::get_chat_response).
    pub fn predictive(deployment: &str, user_prompt: &str) -> Self {
        Self {
            deployment: deployment.to_string(),
            system_prompt: prompts::CHAT_SYSTEM.to_string(),
            user_prompt: user_prompt.to_string(),
            temperature: 0.5,
            max_tokens: 800,
            top_p: 0.95,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub text: String,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "256x256")]
    Size256x256,
    #[serde(rename = "512x512")]
    Size512x512,
    #[default]
    #[serde(rename = "1024x1024")]
    Size1024x1024,
    #[serde(rename = "1792x1024")]
    Size1792x1024,
    #[serde(rename = "1024x1792")]
    Size1024x1792,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    #[default]
    Standard,
    Hd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub deployment: String,
    pub prompt: String,
    pub size: ImageSize,
    pub quality: ImageQuality,
}

impl ImageRequest {
    /// A 1024x1024 standard-quality picture of a named location.
    pub fn for_location(deployment: &str, location: &str) -> Self {
        Self {
            deployment: deployment.to_string(),
            prompt: prompts::location_image(location),
            size: ImageSize::Size1024x1024,
            quality: ImageQuality::Standard,
        }
    }
}

/// Where a generated image lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(Url),
    /// Image bytes returned in the response body.
    Inline(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    pub source: ImageSource,
    pub revised_prompt: Option<String>,
}

impl ImageResult {
    pub fn source_uri(&self) -> Option<&Url> {
        match &self.source {
            ImageSource::Url(url) => Some(url),
            ImageSource::Inline(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_unconfigured() {
        let config = ClientConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.chat_deployment, "GPT-4O");
        assert_eq!(config.image_deployment, "DALL-E");
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_config_requires_endpoint_and_key() {
        assert!(ClientConfig::new("https://example.openai.azure.com", "key")
            .unwrap()
            .is_configured());
        assert!(!ClientConfig::new("https://example.openai.azure.com", "")
            .unwrap()
            .is_configured());
        assert!(!ClientConfig::new("", "key").unwrap().is_configured());
    }

    #[test]
    fn test_config_builders() {
        let config = ClientConfig::new("https://example.openai.azure.com", "key")
            .unwrap()
            .with_chat_deployment("gpt-4o-mini")
            .with_image_deployment("dall-e-3")
            .with_api_version("2024-10-21")
            .with_request_timeout(Duration::from_secs(20));

        assert_eq!(config.chat_deployment, "gpt-4o-mini");
        assert_eq!(config.image_deployment, "dall-e-3");
        assert_eq!(config.api_version, "2024-10-21");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(20)));
    }

    #[test]
    fn test_config_rejects_malformed_endpoint() {
        let err = ClientConfig::new("not a url", "key").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_lookup_missing_vars_is_unconfigured() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert!(!config.is_configured());
    }

    #[test]
    fn test_from_lookup_reads_all_vars() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("AZURE_OPENAI_ENDPOINT", "https://maps.openai.azure.com/"),
            ("AZURE_OPENAI_API_KEY", "secret"),
            ("AZURE_OPENAI_CHAT_DEPLOYMENT", "chat-dep"),
            ("AZURE_OPENAI_IMAGE_DEPLOYMENT", "image-dep"),
            ("AZURE_OPENAI_API_VERSION", "2024-06-01"),
            ("AI_REQUEST_TIMEOUT_SECS", "45"),
        ]))
        .unwrap();

        assert!(config.is_configured());
        assert_eq!(config.chat_deployment, "chat-dep");
        assert_eq!(config.image_deployment, "image-dep");
        assert_eq!(config.api_version, "2024-06-01");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_from_lookup_blank_values_keep_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("AZURE_OPENAI_ENDPOINT", "https://maps.openai.azure.com/"),
            ("AZURE_OPENAI_API_KEY", "secret"),
            ("AZURE_OPENAI_CHAT_DEPLOYMENT", ""),
            ("AZURE_OPENAI_IMAGE_DEPLOYMENT", "   "),
            ("AZURE_OPENAI_API_VERSION", ""),
            ("AI_REQUEST_TIMEOUT_SECS", ""),
        ]))
        .unwrap();

        assert!(config.is_configured());
        assert_eq!(config.chat_deployment, "GPT-4O");
        assert_eq!(config.image_deployment, "DALL-E");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_from_lookup_trims_deployment_names() {
        let config = ClientConfig::from_lookup(lookup(&[(
            "AZURE_OPENAI_CHAT_DEPLOYMENT",
            " forecast-gpt\n",
        )]))
        .unwrap();
        assert_eq!(config.chat_deployment, "forecast-gpt");
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[("AI_REQUEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let config = ClientConfig::new("https://example.com", "super-secret").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("****"));
    }

    #[test]
    fn test_predictive_chat_request_parameters() {
        let request = ChatRequest::predictive("GPT-4O", "Will it rain?");
        assert_eq!(request.system_prompt, "You are a predictive analytics assistant.");
        assert_eq!(request.user_prompt, "Will it rain?");
        assert_eq!(request.temperature, 0.5);
        assert_eq!(request.max_tokens, 800);
        assert_eq!(request.top_p, 0.95);
        assert_eq!(request.frequency_penalty, 0.0);
        assert_eq!(request.presence_penalty, 0.0);
    }

    #[test]
    fn test_image_request_for_location() {
        let request = ImageRequest::for_location("DALL-E", "Paris");
        assert_eq!(request.prompt, "Share the Paris image.");
        assert_eq!(request.size, ImageSize::Size1024x1024);
        assert_eq!(request.quality, ImageQuality::Standard);
    }

    #[test]
    fn test_image_enums_serialize_to_wire_names() {
        assert_eq!(
            serde_json::to_string(&ImageSize::Size1024x1024).unwrap(),
            "\"1024x1024\""
        );
        assert_eq!(
            serde_json::to_string(&ImageQuality::Standard).unwrap(),
            "\"standard\""
        );
    }
}
