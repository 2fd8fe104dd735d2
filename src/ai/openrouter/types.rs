//! OpenRouter chat-completions payloads.
//!
//! Responses vary by upstream model, so the decode types are unions with an
//! explicit catch-all variant instead of strict structs.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Request body for `/chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Outbound chat turn.
#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    pub fn user(content: Vec<ContentPart>) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

/// One typed segment of a multimodal message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
    #[default]
    #[serde(other)]
    Unsupported,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

/// Image URL wrapper shared by content parts and generated images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Top-level chat completion response.
#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// Single choice item returned by chat completions.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Assistant message as returned by the backend.
#[derive(Debug, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<MessageContent>,
    #[serde(default, deserialize_with = "lenient_images")]
    pub images: Option<Vec<GeneratedImage>>,
}

/// The two known content shapes, plus anything else.
#[derive(Debug)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
    Unrecognized(Value),
}

impl<'de> Deserialize<'de> for MessageContent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => MessageContent::Text(text),
            Value::Array(items) => MessageContent::Parts(decode_each(items)),
            other => MessageContent::Unrecognized(other),
        })
    }
}

/// Entry of the dedicated `images` array on a response message.
#[derive(Debug, Default, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratedImage {
    ImageUrl { image_url: ImageUrl },
    #[default]
    #[serde(other)]
    Unsupported,
}

/// Decode array elements one at a time; an element that does not fit its
/// type becomes the type's default (`Unsupported`) instead of failing the
/// whole message.
fn decode_each<T: DeserializeOwned + Default>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).unwrap_or_else(|e| {
                tracing::debug!("Skipping malformed response element: {}", e);
                T::default()
            })
        })
        .collect()
}

fn lenient_images<'de, D>(deserializer: D) -> Result<Option<Vec<GeneratedImage>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(decode_each(items)),
        _ => None,
    })
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorEnvelope {
    #[serde(default)]
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorDetail {
    /// Numeric error code, accepting both `429` and `"429"`.
    pub fn code(&self) -> Option<u16> {
        match self.code.as_ref()? {
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Providers sometimes pass their own JSON error body through as the
    /// message string; unwrap one level of that.
    pub fn unwrap_nested(self) -> Self {
        let nested = self
            .message
            .as_deref()
            .and_then(|message| serde_json::from_str::<ApiErrorEnvelope>(message).ok())
            .and_then(|envelope| envelope.error);

        match nested {
            Some(inner) if inner.message.is_some() || inner.code.is_some() => Self {
                code: inner.code.or(self.code),
                message: inner.message.or(self.message),
            },
            _ => self,
        }
    }
}
