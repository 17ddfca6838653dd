//! Prompt forwarding client for a hosted AI provider
//!
//! Sends user prompts to an Azure OpenAI chat deployment and location names
//! to an image deployment, returning plain text or a lazily loaded image.

pub mod ai;
pub mod client;
pub mod error;
pub mod image;
pub mod models;
pub mod prompts;

pub use client::PromptClient;
pub use error::{Error, Result};
