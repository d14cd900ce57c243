//! Image encoding: `DynamicImage` → JPEG bytes → base64 data-URI.
//!
//! The captioning endpoint accepts images as base64 data-URIs embedded in the
//! JSON request body. JPEG is used because the payload is a photograph-like
//! raster headed for a vision model, where JPEG's size advantage matters more
//! than lossless fidelity, and because the same encoding is what gets burned
//! back into the document.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a pixel buffer as JPEG bytes.
///
/// JPEG has no alpha channel, so anything with transparency is flattened to
/// RGB first.
pub fn jpeg_bytes(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    rgb.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)?;
    Ok(buf)
}

/// Wrap encoded JPEG bytes as a `data:image/jpeg;base64,…` URI for the
/// captioning request payload.
pub fn jpeg_data_uri(bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded image → {} bytes base64", b64.len());
    format!("data:image/jpeg;base64,{b64}")
}
