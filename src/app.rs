//! Application orchestration for the command-line front end.
//!
//! Reads input images from disk, delegates to the configured services, and
//! writes inline image results back to disk.

use crate::ai::mime::{extension_for_mime, parse_data_uri};
use crate::ai::{
    ImageEditService, OpenRouterHttpClient, OpenRouterImageClient, OpenRouterVideoClient,
    VideoGenerationService,
};
use crate::models::{AspectRatio, Config, EditRequest, GenerationResult, ImageInput, VideoRequest};
use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Where an image result ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutput {
    /// Inline data URI decoded and written to this path.
    Saved(PathBuf),
    /// External URL returned by the backend; not downloaded.
    Remote(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageOutcome {
    pub output: ImageOutput,
    pub text: Option<String>,
}

/// File-based inputs for an edit.
#[derive(Debug, Clone)]
pub struct EditInput {
    pub image: PathBuf,
    pub mask: Option<PathBuf>,
    pub reference: Option<PathBuf>,
    pub prompt: String,
}

/// Coordinates the image and video services.
pub struct App {
    images: Box<dyn ImageEditService>,
    video: Box<dyn VideoGenerationService>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub images: Box<dyn ImageEditService>,
    pub video: Box<dyn VideoGenerationService>,
}

impl App {
    pub fn with_services(services: AppServices) -> Self {
        Self {
            images: services.images,
            video: services.video,
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;
        Ok(Self::from_config(&config))
    }

    pub fn from_config(config: &Config) -> Self {
        // Reuse one HTTP connection pool across both clients.
        let http_client = reqwest::Client::new();

        info!("Image model: {}", config.image_model);
        info!("Video model: {}", config.video_model);

        Self::with_services(AppServices {
            images: Box::new(OpenRouterImageClient::new(
                OpenRouterHttpClient::from_config(config, http_client.clone()),
                config.image_model.clone(),
            )),
            video: Box::new(OpenRouterVideoClient::new(
                OpenRouterHttpClient::from_config(config, http_client),
                config.video_model.clone(),
            )),
        })
    }

    pub async fn edit(&self, input: &EditInput, output: &Path) -> Result<ImageOutcome> {
        let image = read_image(&input.image)?;
        let mask = match &input.mask {
            Some(path) => Some(read_image(path)?.data),
            None => None,
        };
        let secondary = match &input.reference {
            Some(path) => Some(read_image(path)?),
            None => None,
        };

        let request = EditRequest {
            image,
            mask,
            secondary,
            prompt: input.prompt.clone(),
        };

        info!(
            "Editing {} (mask: {}, reference: {})",
            input.image.display(),
            request.mask.is_some(),
            request.secondary.is_some()
        );

        let result = self.images.edit_image(&request).await?;
        save_result(result, output)
    }

    pub async fn generate(&self, prompt: &str, output: &Path) -> Result<ImageOutcome> {
        info!("Generating image from prompt");
        let result = self.images.generate_image(prompt).await?;
        save_result(result, output)
    }

    pub async fn video(
        &self,
        image: Option<&Path>,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<String> {
        let request = VideoRequest {
            image: image.map(read_image).transpose()?,
            prompt: prompt.to_string(),
            aspect_ratio,
        };

        self.video
            .generate_video(&request, &|status: &str| info!("{}", status))
            .await
    }
}

fn read_image(path: &Path) -> Result<ImageInput> {
    let bytes = fs::read(path)?;
    Ok(ImageInput::from_bytes(&bytes))
}

fn save_result(result: GenerationResult, output: &Path) -> Result<ImageOutcome> {
    if !result.image_url.starts_with("data:") {
        info!("Model returned an external image URL");
        return Ok(ImageOutcome {
            output: ImageOutput::Remote(result.image_url),
            text: result.text,
        });
    }

    let (mime, bytes) = parse_data_uri(&result.image_url)?;
    let path = if output.extension().is_some() {
        output.to_path_buf()
    } else {
        output.with_extension(extension_for_mime(&mime))
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, &bytes)?;
    info!("Saved {} ({} bytes) to {}", mime, bytes.len(), path.display());

    Ok(ImageOutcome {
        output: ImageOutput::Saved(path),
        text: result.text,
    })
}
