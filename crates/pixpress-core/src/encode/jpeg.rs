//! Lossy JPEG encoding.
//!
//! Output is always baseline JPEG from the `image` crate's encoder, whatever
//! the input format was.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::decode::DecodedImage;
use crate::params::quality_factor_to_encoder;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode a pixel buffer as JPEG using a quality factor in `[0, 1]`.
///
/// The factor is mapped monotonically onto the encoder's 1-100 scale, so a
/// lower factor never selects a finer quantizer than a higher one.
pub fn encode_image(image: &DecodedImage, quality_factor: f64) -> Result<Vec<u8>, EncodeError> {
    encode_jpeg(
        &image.pixels,
        image.width,
        image.height,
        quality_factor_to_encoder(quality_factor),
    )
}

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality); clamped
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for a zero-sized buffer and
/// `EncodeError::InvalidPixelData` when `pixels` does not hold exactly
/// `width * height * 3` bytes.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected_len = DecodedImage::expected_len(width, height);
    if pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);
    let mut buffer = Vec::new();

    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}
