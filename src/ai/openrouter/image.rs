use super::client::OpenRouterHttpClient;
use super::extract::extract_image;
use super::payload;
use super::types::{ChatCompletionRequest, ChatMessage, ContentPart};
use crate::ai::ImageEditService;
use crate::models::{EditRequest, GenerationResult};
use crate::Result;
use async_trait::async_trait;

pub struct OpenRouterImageClient {
    http: OpenRouterHttpClient,
    model: String,
}

impl OpenRouterImageClient {
    pub fn new(http: OpenRouterHttpClient, model: String) -> Self {
        Self { http, model }
    }

    async fn send_and_extract(&self, content: Vec<ContentPart>) -> Result<GenerationResult> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(content)],
        };

        let body = self.http.chat_completion(&request).await?;
        let result = extract_image(&body)?;

        tracing::debug!(
            "Extracted image reference ({} chars, text: {})",
            result.image_url.len(),
            result.text.is_some()
        );
        Ok(result)
    }
}

#[async_trait]
impl ImageEditService for OpenRouterImageClient {
    async fn edit_image(&self, request: &EditRequest) -> Result<GenerationResult> {
        self.send_and_extract(payload::edit_content(request)).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<GenerationResult> {
        self.send_and_extract(payload::generate_content(prompt)).await
    }
}
