//! Downscaling of RGB pixel buffers.
//!
//! Resampling always produces a new `DecodedImage`; the input buffer is never
//! modified. Nearest-neighbor sampling is deliberately not offered because it
//! aliases badly when shrinking, which defeats the point of trading pixels for
//! bytes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors that can occur while resampling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResampleError {
    /// Target width or height is zero.
    #[error("Invalid target dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Source pixel data length doesn't match its dimensions.
    #[error("Invalid source pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },
}

/// Interpolation filter used when shrinking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    /// Bilinear (triangle) interpolation. Fast, good for moderate shrink.
    #[default]
    Bilinear,
    /// Catmull-Rom cubic interpolation. Sharper than bilinear.
    CatmullRom,
    /// Lanczos3 windowed sinc. Slowest, highest quality.
    Lanczos3,
}

impl ResampleFilter {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            ResampleFilter::Bilinear => image::imageops::FilterType::Triangle,
            ResampleFilter::CatmullRom => image::imageops::FilterType::CatmullRom,
            ResampleFilter::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Resample an image to exact dimensions.
///
/// When the target equals the source dimensions the pixels are copied
/// without filtering.
///
/// # Errors
///
/// Returns `ResampleError::InvalidDimensions` if either target dimension is
/// zero, and `ResampleError::InvalidPixelData` if the source buffer does not
/// match its declared dimensions.
pub fn resample(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> Result<DecodedImage, ResampleError> {
    if width == 0 || height == 0 {
        return Err(ResampleError::InvalidDimensions { width, height });
    }

    let view = image
        .as_rgb_view()
        .filter(|_| !image.is_empty())
        .ok_or(ResampleError::InvalidPixelData {
            expected: DecodedImage::expected_len(image.width, image.height),
            actual: image.pixels.len(),
        })?;

    // Identity: nothing to filter
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let resized = image::imageops::resize(&view, width, height, filter.to_image_filter());
    Ok(DecodedImage::from_rgb_image(resized))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: output always has exactly the requested dimensions.
        #[test]
        fn prop_output_matches_target(
            (src_w, src_h) in (1u32..=40, 1u32..=40),
            (dst_w, dst_h) in (1u32..=40, 1u32..=40),
        ) {
            let img = DecodedImage::new(src_w, src_h, vec![77u8; (src_w * src_h * 3) as usize]);
            let out = resample(&img, dst_w, dst_h, ResampleFilter::Bilinear).unwrap();

            prop_assert_eq!((out.width, out.height), (dst_w, dst_h));
            prop_assert_eq!(out.pixels.len(), (dst_w * dst_h * 3) as usize);
        }
    }
}
