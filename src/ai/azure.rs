use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ImageGenerationRequest,
    ImageGenerationResponse,
};
use super::AiTransport;
use crate::models::{
    ChatRequest, ChatResponse, Credential, ImageRequest, ImageResult, ImageSource,
};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Azure OpenAI REST transport. Deployments are addressed by path and the key
/// is sent in the `api-key` header.
pub struct AzureOpenAiTransport {
    client: Client,
    endpoint: Url,
    credential: Credential,
    api_version: String,
}

impl AzureOpenAiTransport {
    pub fn new_with_client(
        client: Client,
        endpoint: Url,
        credential: Credential,
        api_version: String,
    ) -> Self {
        Self {
            client,
            endpoint,
            credential,
            api_version,
        }
    }

    fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            deployment,
            operation
        )
    }

    async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        url: &str,
        request: &Req,
    ) -> Result<Resp> {
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", self.credential.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Azure OpenAI: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Azure OpenAI API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "Azure OpenAI API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Azure OpenAI response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Azure OpenAI response: {}", e))
        })
    }
}

#[async_trait]
impl AiTransport for AzureOpenAiTransport {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let body = ChatCompletionRequest {
            messages: vec![
                ChatMessage::system(&request.system_prompt),
                ChatMessage::user(&request.user_prompt),
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            frequency_penalty: request.frequency_penalty,
            presence_penalty: request.presence_penalty,
        };

        let url = self.deployment_url(&request.deployment, "chat/completions");
        let response: ChatCompletionResponse = self.post(&url, &body).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmptyResponse("no choices in chat response".to_string()))?;

        let text = choice.message.content.ok_or_else(|| {
            Error::EmptyResponse("first chat choice has no content".to_string())
        })?;

        Ok(ChatResponse {
            text,
            finish_reason: choice.finish_reason,
        })
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageResult> {
        let body = ImageGenerationRequest {
            prompt: request.prompt.clone(),
            n: 1,
            size: request.size,
            quality: request.quality,
        };

        let url = self.deployment_url(&request.deployment, "images/generations");
        let response: ImageGenerationResponse = self.post(&url, &body).await?;

        let image_data = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmptyResponse("no image data in response".to_string()))?;

        let source = if let Some(url) = &image_data.url {
            let url = Url::parse(url).map_err(|e| {
                Error::AiProvider(format!("Invalid image URL '{}': {}", url, e))
            })?;
            ImageSource::Url(url)
        } else if let Some(b64_json) = &image_data.b64_json {
            use base64::Engine as _;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(b64_json)
                .map_err(|e| Error::AiProvider(format!("Failed to decode base64 image: {}", e)))?;
            ImageSource::Inline(bytes)
        } else {
            return Err(Error::EmptyResponse(
                "no image data (neither URL nor base64) in response".to_string(),
            ));
        };

        Ok(ImageResult {
            source,
            revised_prompt: image_data.revised_prompt,
        })
    }
}
