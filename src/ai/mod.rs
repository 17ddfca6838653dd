//! AI service integration for chat completion and image generation
//!
//! [`AiTransport`] is the seam between [`PromptClient`](crate::PromptClient)
//! and the hosted provider. [`AzureOpenAiTransport`] talks to Azure OpenAI;
//! [`MockTransport`] is a scripted stand-in for tests.

pub mod azure;
pub mod mock;
pub mod types;

pub use azure::AzureOpenAiTransport;
pub use mock::MockTransport;

use crate::models::{ChatRequest, ChatResponse, ImageRequest, ImageResult};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AiTransport: Send + Sync {
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse>;
    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageResult>;
}
