//! Avatar image processing
//!
//! Accepts raw image bytes (PNG, JPEG, WebP), bounds the size, scales
//! down to a square-ish thumbnail and re-encodes as JPEG wrapped in a
//! base64 data URL, which is what the member document stores.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::imageops::FilterType;
use std::io::Cursor;

use crate::core::AppError;
use crate::utils::validation::MAX_AVATAR_BYTES;

/// JPEG quality (85% - keeps faces recognizable while controlling document size)
const JPEG_QUALITY: u8 = 85;

/// Thumbnail bounding box in pixels
const MAX_DIMENSION: u32 = 256;

/// Validate, downscale and re-encode an uploaded avatar, returning the
/// `data:image/jpeg;base64,...` URL to store on the member.
pub fn process_avatar(data: &[u8]) -> Result<String, AppError> {
    if data.is_empty() {
        return Err(AppError::validation("Empty image provided"));
    }
    if data.len() > MAX_AVATAR_BYTES {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {} bytes ({}MB)",
            MAX_AVATAR_BYTES,
            MAX_AVATAR_BYTES / 1024 / 1024
        )));
    }

    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        img
    };

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to compress image: {e}")))?;
    }

    Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(&buffer)))
}
