//! Normalizes chat-completion bodies into a [`GenerationResult`] or a video URL.
//!
//! Image rules run in a fixed order and the first image reference found is
//! never overwritten:
//! 1. the first entry of `message.images`
//! 2. a string `content` becomes the text result
//! 3. typed `content` parts (first image wins, text parts joined by `\n`)
//! 4. regex scan of a string `content`: inline data URI, then image URL

use super::types::{ChatCompletionResponse, ContentPart, GeneratedImage, MessageContent};
use crate::models::GenerationResult;
use crate::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

pub const CONTENT_FILTER: &str = "content_filter";

static DATA_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"data:image/[A-Za-z0-9.+-]+;base64,[A-Za-z0-9+/]+=*").expect("valid regex")
});

static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>()\]]+\.(?:png|jpe?g|gif|webp)\b"#).expect("valid regex")
});

static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>()\]]+\.(?:mp4|webm|mov)\b"#).expect("valid regex")
});

fn decode(body: &Value) -> Result<ChatCompletionResponse> {
    serde_json::from_value(body.clone()).map_err(|e| {
        tracing::error!("Failed to decode chat completion: {}\nBody: {}", e, body);
        Error::UnexpectedResponse(e.to_string())
    })
}

/// Blank values count as absent; anything else is kept verbatim.
fn non_empty(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

pub fn extract_image(body: &Value) -> Result<GenerationResult> {
    let response = decode(body)?;
    let raw_message = body
        .pointer("/choices/0/message")
        .map(Value::to_string)
        .unwrap_or_else(|| "null".to_string());

    let (message, finish_reason) = match response.choices.into_iter().next() {
        Some(choice) => (choice.message.unwrap_or_default(), choice.finish_reason),
        None => (Default::default(), None),
    };

    let mut image_url = message
        .images
        .as_ref()
        .and_then(|images| images.first())
        .and_then(|image| match image {
            GeneratedImage::ImageUrl { image_url } => non_empty(&image_url.url),
            GeneratedImage::Unsupported => None,
        });

    let mut text = None;

    match &message.content {
        Some(MessageContent::Text(content)) => {
            text = non_empty(content);
            if image_url.is_none() {
                image_url = DATA_URI
                    .find(content)
                    .or_else(|| IMAGE_URL.find(content))
                    .map(|m| m.as_str().to_string());
            }
        }
        Some(MessageContent::Parts(parts)) if image_url.is_none() => {
            let mut texts = Vec::new();
            for part in parts {
                match part {
                    ContentPart::ImageUrl { image_url: url } => {
                        if image_url.is_none() {
                            image_url = non_empty(&url.url);
                        }
                    }
                    ContentPart::Text { text: part } => texts.push(part.as_str()),
                    ContentPart::Unsupported => {}
                }
            }
            text = non_empty(&texts.join("\n"));
        }
        Some(MessageContent::Parts(_)) | None => {}
        Some(MessageContent::Unrecognized(value)) => {
            tracing::warn!("Unrecognized message content shape: {}", value);
        }
    }

    match image_url {
        Some(image_url) => Ok(GenerationResult { image_url, text }),
        None => {
            tracing::error!(
                "No image in model response (finish_reason: {:?}): {}",
                finish_reason,
                raw_message
            );
            Err(missing_image_error(text, finish_reason.as_deref(), raw_message))
        }
    }
}

fn missing_image_error(text: Option<String>, finish_reason: Option<&str>, raw: String) -> Error {
    match text {
        Some(text) => Error::ModelResponded(text),
        None if finish_reason == Some(CONTENT_FILTER) => Error::SafetyBlocked { raw },
        None => Error::NoImage { raw },
    }
}

/// Video responses are only searched for a video URL inside string content.
pub fn extract_video_url(body: &Value) -> Result<String> {
    let response = decode(body)?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content);

    match content {
        Some(MessageContent::Text(content)) => VIDEO_URL
            .find(&content)
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                tracing::error!("No video URL in model response: {}", content);
                Error::NoVideo
            }),
        _ => Err(Error::NoVideo),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn body(message: Value) -> Value {
        json!({ "choices": [{ "message": message, "finish_reason": "stop" }] })
    }

    #[test]
    fn test_images_array_wins_over_content() {
        let result = extract_image(&body(json!({
            "content": "here you go data:image/png;base64,BBBB",
            "images": [{ "type": "image_url", "image_url": { "url": "data:image/png;base64,AAAA" } }]
        })))
        .unwrap();

        assert_eq!(result.image_url, "data:image/png;base64,AAAA");
        assert_eq!(
            result.text.as_deref(),
            Some("here you go data:image/png;base64,BBBB")
        );
    }

    #[test]
    fn test_only_first_images_entry_is_considered() {
        let result = extract_image(&body(json!({
            "content": "https://cdn.test/fallback.png",
            "images": [
                { "type": "thumbnail", "url": "ignored" },
                { "type": "image_url", "image_url": { "url": "data:image/png;base64,AAAA" } }
            ]
        })))
        .unwrap();

        assert_eq!(result.image_url, "https://cdn.test/fallback.png");
    }

    #[test]
    fn test_data_uri_fallback_in_string_content() {
        let result = extract_image(&body(json!({
            "content": "Edited image: data:image/png;base64,AAAA done."
        })))
        .unwrap();

        assert_eq!(result.image_url, "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_data_uri_preferred_over_url_in_string_content() {
        let result = extract_image(&body(json!({
            "content": "https://cdn.test/a.png and data:image/webp;base64,QUJD"
        })))
        .unwrap();

        assert_eq!(result.image_url, "data:image/webp;base64,QUJD");
    }

    #[test]
    fn test_image_url_fallback_is_case_insensitive() {
        let result = extract_image(&body(json!({
            "content": "Download it at https://cdn.test/renders/Out.JPEG."
        })))
        .unwrap();

        assert_eq!(result.image_url, "https://cdn.test/renders/Out.JPEG");
    }

    #[test]
    fn test_parts_first_image_wins_and_text_joined() {
        let result = extract_image(&body(json!({
            "content": [
                { "type": "text", "text": "First line" },
                { "type": "image_url", "image_url": { "url": "data:image/png;base64,AAAA" } },
                { "type": "image_url", "image_url": { "url": "data:image/png;base64,BBBB" } },
                { "type": "text", "text": "Second line" }
            ]
        })))
        .unwrap();

        assert_eq!(
            result,
            GenerationResult {
                image_url: "data:image/png;base64,AAAA".to_string(),
                text: Some("First line\nSecond line".to_string()),
            }
        );
    }

    #[test]
    fn test_text_only_reply_reports_model_text() {
        let err = extract_image(&body(json!({ "content": "I can't edit faces." }))).unwrap_err();
        assert!(matches!(err, Error::ModelResponded(ref t) if t == "I can't edit faces."));
        assert_eq!(err.to_string(), "The model responded: I can't edit faces.");
    }

    #[test]
    fn test_content_filter_reports_safety_message() {
        let response = json!({
            "choices": [{
                "message": { "role": "assistant", "content": null },
                "finish_reason": "content_filter"
            }]
        });

        let err = extract_image(&response).unwrap_err();
        assert!(matches!(err, Error::SafetyBlocked { .. }));
        let message = err.to_string();
        assert!(message.contains("safety filter"));
        assert!(message.contains("\"role\":\"assistant\""));
    }

    #[test]
    fn test_silent_refusal_reports_generic_message() {
        let err = extract_image(&body(json!({ "content": "" }))).unwrap_err();
        assert!(matches!(err, Error::NoImage { .. }));
    }

    #[test]
    fn test_missing_choices_is_not_an_image() {
        let err = extract_image(&json!({ "choices": [] })).unwrap_err();
        assert!(matches!(err, Error::NoImage { ref raw } if raw == "null"));
    }

    #[test]
    fn test_malformed_choices_is_unexpected_response() {
        let err = extract_image(&json!({ "choices": "nope" })).unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
    }

    #[test]
    fn test_unrecognized_content_shape_yields_no_image() {
        let err = extract_image(&body(json!({ "content": { "odd": 1 } }))).unwrap_err();
        assert!(matches!(err, Error::NoImage { .. }));
    }

    #[test]
    fn test_video_url_extracted_from_string_content() {
        let url = extract_video_url(&body(json!({
            "content": "Your video is ready: https://x.test/out.mp4"
        })))
        .unwrap();
        assert_eq!(url, "https://x.test/out.mp4");
    }

    #[test]
    fn test_video_ignores_images_and_parts() {
        let err = extract_video_url(&body(json!({
            "content": [{ "type": "text", "text": "https://x.test/out.mp4" }]
        })))
        .unwrap_err();
        assert!(matches!(err, Error::NoVideo));

        let err = extract_video_url(&body(json!({
            "content": "see data:image/png;base64,AAAA"
        })))
        .unwrap_err();
        assert!(matches!(err, Error::NoVideo));
    }

    #[test]
    fn test_malformed_later_images_entry_keeps_first() {
        let result = extract_image(&body(json!({
            "images": [
                { "type": "image_url", "image_url": { "url": "data:image/png;base64,AAAA" } },
                { "image_url": { "url": "x" } }
            ]
        })))
        .unwrap();

        assert_eq!(result.image_url, "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_malformed_part_keeps_sibling_image() {
        let result = extract_image(&body(json!({
            "content": [
                { "type": "image_url", "image_url": { "url": "data:image/png;base64,AAAA" } },
                { "type": "text", "text": null }
            ]
        })))
        .unwrap();

        assert_eq!(result.image_url, "data:image/png;base64,AAAA");
        assert_eq!(result.text, None);
    }

    #[test]
    fn test_null_images_url_falls_back_to_content() {
        let result = extract_image(&body(json!({
            "content": "see data:image/png;base64,AAAA",
            "images": [{ "type": "image_url", "image_url": { "url": null } }]
        })))
        .unwrap();

        assert_eq!(result.image_url, "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_model_text_is_kept_verbatim() {
        let err = extract_image(&body(json!({ "content": "  Sorry, no.\n" }))).unwrap_err();
        assert_eq!(err.to_string(), "The model responded:   Sorry, no.\n");

        let result = extract_image(&body(json!({
            "content": [
                { "type": "text", "text": " indented" },
                { "type": "image_url", "image_url": { "url": "https://cdn.test/a.png" } }
            ]
        })))
        .unwrap();
        assert_eq!(result.text.as_deref(), Some(" indented"));
    }

    #[test]
    fn test_video_tolerates_malformed_images_and_parts() {
        let url = extract_video_url(&body(json!({
            "content": "Ready: https://x.test/out.mp4",
            "images": [
                { "type": "image_url", "image_url": { "url": null } },
                { "image_url": { "url": "x" } }
            ]
        })))
        .unwrap();
        assert_eq!(url, "https://x.test/out.mp4");

        let err = extract_video_url(&body(json!({
            "content": [
                { "type": "text", "text": null },
                { "type": "text", "text": "https://x.test/out.mp4" }
            ]
        })))
        .unwrap_err();
        assert!(matches!(err, Error::NoVideo));
    }
}
