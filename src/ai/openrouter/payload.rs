//! Builds the ordered content parts for each operation.
//!
//! Image parts always precede the single trailing text part. Inputs are not
//! validated here; the backend is the only judge of malformed images.

use super::types::ContentPart;
use crate::models::{EditRequest, ImageInput, VideoRequest};
use crate::prompts;

/// Primary image, then mask, then secondary image, then the prompt.
pub fn edit_content(request: &EditRequest) -> Vec<ContentPart> {
    let mut parts = vec![ContentPart::image(request.image.data_uri())];

    let prompt = match &request.mask {
        Some(mask) => {
            parts.push(ContentPart::image(ImageInput::png(mask.as_str()).data_uri()));
            prompts::render(prompts::MASKED_EDIT, &[("prompt", request.prompt.as_str())])
        }
        None => request.prompt.clone(),
    };

    if let Some(secondary) = &request.secondary {
        parts.push(ContentPart::image(secondary.data_uri()));
    }

    parts.push(ContentPart::text(prompt));
    parts
}

pub fn generate_content(prompt: &str) -> Vec<ContentPart> {
    vec![ContentPart::text(prompt)]
}

pub fn video_content(request: &VideoRequest) -> Vec<ContentPart> {
    let mut parts = Vec::with_capacity(2);

    if let Some(image) = &request.image {
        parts.push(ContentPart::image(image.data_uri()));
    }

    // Aspect ratio first so placeholders typed into the prompt stay literal.
    let aspect_ratio = request.aspect_ratio.to_string();
    let text = prompts::render(prompts::VIDEO, &[("aspect_ratio", aspect_ratio.as_str())])
        .replace("{{prompt}}", &request.prompt);
    parts.push(ContentPart::text(text));
    parts
}
