use super::types::{ApiErrorEnvelope, ChatCompletionRequest};
use crate::models::{Config, DEFAULT_BASE_URL, DEFAULT_REFERER};
use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// Fixed client identifier sent as `X-Title`.
pub const CLIENT_TITLE: &str = "Image Studio";

/// Lightweight OpenRouter REST client shared by the image and video modules.
///
/// No timeout is applied; callers that need one wrap the future themselves.
pub struct OpenRouterHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
    referer: String,
}

impl OpenRouterHttpClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_client(api_key, Client::new())
    }

    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
        }
    }

    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new_with_client(config.api_key.clone(), client)
            .with_base_url(config.base_url.clone())
            .with_referer(config.referer.clone())
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_referer(mut self, referer: String) -> Self {
        self.referer = referer;
        self
    }

    /// POSTs to `/chat/completions` and returns the decoded JSON body.
    pub async fn chat_completion(&self, request: &ChatCompletionRequest) -> Result<Value> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!("Sending chat completion request to OpenRouter (model: {})", request.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", CLIENT_TITLE)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to OpenRouter: {}", e);
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("OpenRouter API error (status {}): {}", status, error_text);
            return Err(classify_api_error(status, &error_text));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse OpenRouter response: {}\nBody: {}", e, body);
            Error::Serialization(e)
        })
    }
}

/// Map a non-2xx response body to a user-facing error.
///
/// Embedded code 429 and 500 get fixed guidance; anything else surfaces the
/// body's message verbatim, or a generic status message when there is none.
pub fn classify_api_error(status: StatusCode, body: &str) -> Error {
    let envelope: ApiErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    let detail = envelope.error.map(|detail| detail.unwrap_nested());

    match detail.as_ref().and_then(|detail| detail.code()) {
        Some(429) => return Error::RateLimited,
        Some(500) => return Error::ServerUnavailable,
        _ => {}
    }

    let message = detail
        .and_then(|detail| detail.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("API request failed with status {}", status.as_u16()));

    Error::Api {
        status: status.as_u16(),
        message,
    }
}
