use super::client::OpenRouterHttpClient;
use super::extract::extract_video_url;
use super::payload;
use super::types::{ChatCompletionRequest, ChatMessage};
use crate::ai::VideoGenerationService;
use crate::models::VideoRequest;
use crate::Result;
use async_trait::async_trait;

pub const STATUS_SENDING: &str = "Sending request to the video model...";
pub const STATUS_PROCESSING: &str = "Processing video response...";

pub struct OpenRouterVideoClient {
    http: OpenRouterHttpClient,
    model: String,
}

impl OpenRouterVideoClient {
    pub fn new(http: OpenRouterHttpClient, model: String) -> Self {
        Self { http, model }
    }
}

#[async_trait]
impl VideoGenerationService for OpenRouterVideoClient {
    async fn generate_video(
        &self,
        request: &VideoRequest,
        progress: &(dyn Fn(&str) + Send + Sync),
    ) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(payload::video_content(request))],
        };

        progress(STATUS_SENDING);
        let body = self.http.chat_completion(&request).await?;
        progress(STATUS_PROCESSING);

        extract_video_url(&body)
    }
}
