//! Data models and structures
//!
//! Defines the inputs accepted by the image and video services, the
//! normalized generation result, and environment-driven configuration.

use crate::ai::mime::detect_image_mime;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_REFERER: &str = "http://localhost";
pub const DEFAULT_IMAGE_MODEL: &str = "google/gemini-2.5-flash-image-preview";
pub const DEFAULT_VIDEO_MODEL: &str = "google/veo-3";

/// A base64-encoded image plus its MIME type.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInput {
    pub data: String,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Masks are always transmitted as PNG.
    pub fn png(data: impl Into<String>) -> Self {
        Self::new(data, "image/png")
    }

    /// Encode raw file bytes, sniffing the MIME type from magic bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        use base64::Engine as _;
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: detect_image_mime(bytes).to_string(),
        }
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Inputs for an image edit.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub image: ImageInput,
    /// Base64 PNG mask marking the region to edit.
    pub mask: Option<String>,
    pub secondary: Option<ImageInput>,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    #[default]
    Landscape,
    Portrait,
    Square,
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ratio = match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
        };
        f.write_str(ratio)
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Portrait),
            "1:1" => Ok(AspectRatio::Square),
            other => Err(format!(
                "Invalid aspect ratio '{}'. Expected one of: 16:9, 9:16, 1:1",
                other
            )),
        }
    }
}

/// Inputs for a video generation.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub image: Option<ImageInput>,
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
}

/// Normalized output of an image call.
///
/// `image_url` is either a `data:` URI or an external URL and is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub image_url: String,
    pub text: Option<String>,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub referer: String,
    pub image_model: String,
    pub video_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build and validate configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = non_empty("OPENROUTER_API_KEY")
            .ok_or_else(|| Error::Config("OPENROUTER_API_KEY not set".to_string()))?;

        let base_url = non_empty("OPENROUTER_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            base_url,
            referer: non_empty("OPENROUTER_HTTP_REFERER")
                .unwrap_or_else(|| DEFAULT_REFERER.to_string()),
            image_model: non_empty("IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            video_model: non_empty("VIDEO_MODEL")
                .unwrap_or_else(|| DEFAULT_VIDEO_MODEL.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_config_requires_api_key() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Config::from_lookup(lookup(&[("OPENROUTER_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup(&[("OPENROUTER_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.referer, DEFAULT_REFERER);
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.video_model, DEFAULT_VIDEO_MODEL);
    }

    #[test]
    fn test_config_overrides_and_trims_base_url() {
        let config = Config::from_lookup(lookup(&[
            ("OPENROUTER_API_KEY", "sk-test"),
            ("OPENROUTER_BASE_URL", "http://proxy.local/v1/"),
            ("IMAGE_MODEL", "custom/image"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://proxy.local/v1");
        assert_eq!(config.image_model, "custom/image");
    }

    #[test]
    fn test_image_input_data_uri() {
        let image = ImageInput::new("AAAA", "image/jpeg");
        assert_eq!(image.data_uri(), "data:image/jpeg;base64,AAAA");
        assert_eq!(ImageInput::png("BBBB").data_uri(), "data:image/png;base64,BBBB");
    }

    #[test]
    fn test_image_input_from_bytes_sniffs_mime() {
        let image = ImageInput::from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "/9j/4A==");
    }

    #[test]
    fn test_aspect_ratio_round_trips_through_display() {
        for ratio in [AspectRatio::Landscape, AspectRatio::Portrait, AspectRatio::Square] {
            assert_eq!(ratio.to_string().parse::<AspectRatio>().unwrap(), ratio);
        }
        assert!("4:3".parse::<AspectRatio>().is_err());
    }
}
