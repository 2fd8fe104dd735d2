//! AI service integration for image editing and video generation
//!
//! Capabilities are exposed as traits so the CLI and tests can swap the
//! OpenRouter-backed clients for in-memory mocks.

pub mod mime;
pub mod mock;
pub mod openrouter;

pub use mock::{MockImageClient, MockVideoClient};
pub use openrouter::{OpenRouterHttpClient, OpenRouterImageClient, OpenRouterVideoClient};

use crate::models::{EditRequest, GenerationResult, VideoRequest};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageEditService: Send + Sync {
    async fn edit_image(&self, request: &EditRequest) -> Result<GenerationResult>;
    async fn generate_image(&self, prompt: &str) -> Result<GenerationResult>;
}

#[async_trait]
pub trait VideoGenerationService: Send + Sync {
    /// `progress` is called with a short status line before the request is
    /// sent and again once a response arrives.
    async fn generate_video(
        &self,
        request: &VideoRequest,
        progress: &(dyn Fn(&str) + Send + Sync),
    ) -> Result<String>;
}
