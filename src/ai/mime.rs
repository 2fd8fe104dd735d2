use crate::{Error, Result};

pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x47, 0x49, 0x46, 0x38, ..] => "image/gif",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        _ => {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?}), falling back to image/png",
                &bytes[..bytes.len().min(4)]
            );
            "image/png"
        }
    }
}

pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "png",
    }
}

/// Split a `data:<mime>;base64,<payload>` URI and decode the payload.
pub fn parse_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let (meta, payload) = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| Error::Generic("Not a data URI".to_string()))?;

    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| Error::Generic("Data URI is not base64-encoded".to_string()))?;

    use base64::Engine as _;
    let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;

    Ok((mime.to_string(), bytes))
}
