use super::{ImageEditService, VideoGenerationService};
use crate::models::{EditRequest, GenerationResult, VideoRequest};
use crate::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Tiny 1x1 PNG returned when no responses are queued.
pub const DEFAULT_IMAGE_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVR4nGP4z8AAAAMBAQDJ/pLvAAAAAElFTkSuQmCC";

pub struct MockImageClient {
    responses: Arc<Mutex<Vec<GenerationResult>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockImageClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_response(self, image_url: &str, text: Option<&str>) -> Self {
        self.responses.lock().unwrap().push(GenerationResult {
            image_url: image_url.to_string(),
            text: text.map(str::to_string),
        });
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn next_response(&self, prompt: &str) -> GenerationResult {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.prompts.lock().unwrap().push(prompt.to_string());

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            GenerationResult {
                image_url: DEFAULT_IMAGE_URI.to_string(),
                text: None,
            }
        } else {
            let index = (*count - 1) % responses.len();
            responses[index].clone()
        }
    }
}

impl Default for MockImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageEditService for MockImageClient {
    async fn edit_image(&self, request: &EditRequest) -> Result<GenerationResult> {
        Ok(self.next_response(&request.prompt))
    }

    async fn generate_image(&self, prompt: &str) -> Result<GenerationResult> {
        Ok(self.next_response(prompt))
    }
}

pub struct MockVideoClient {
    url: String,
    call_count: Arc<Mutex<usize>>,
}

impl MockVideoClient {
    pub fn new() -> Self {
        Self {
            url: "https://videos.test/mock.mp4".to_string(),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_url(mut self, url: String) -> Self {
        self.url = url;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockVideoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VideoGenerationService for MockVideoClient {
    async fn generate_video(
        &self,
        _request: &VideoRequest,
        progress: &(dyn Fn(&str) + Send + Sync),
    ) -> Result<String> {
        *self.call_count.lock().unwrap() += 1;
        progress("mock: sending");
        progress("mock: done");
        Ok(self.url.clone())
    }
}
