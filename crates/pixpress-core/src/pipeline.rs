//! The single compression pipeline shared by single-image and batch callers.
//!
//! ```text
//! bytes -> decode -> (level -> parameters) -> resample -> encode -> data URL -> estimate
//! ```
//!
//! Each run is a pure function of (source, level, settings). A new run
//! produces a new [`CompressedImage`]; earlier results are never touched.

use thiserror::Error;

use crate::config::CompressorConfig;
use crate::decode::{decode_source, DecodeError, DecodedImage, ImageInput, SourceImage};
use crate::encode::{encode_image, EncodeError};
use crate::estimate::{estimate_encoded_size, to_data_url};
use crate::params::{CompressionLevel, CompressionParameters};
use crate::resample::{resample, ResampleError, ResampleFilter};

/// Failure of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("resample failed: {0}")]
    Resample(#[from] ResampleError),

    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),
}

impl CompressError {
    /// Short machine-readable stage name.
    pub fn stage(&self) -> &'static str {
        match self {
            CompressError::Decode(_) => "decode",
            CompressError::Resample(_) => "resample",
            CompressError::Encode(_) => "encode",
        }
    }
}

/// Output of one compression run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedImage {
    image: DecodedImage,
    jpeg: Vec<u8>,
    data_url: String,
    estimated_size: usize,
    parameters: CompressionParameters,
}

impl CompressedImage {
    fn new(image: DecodedImage, jpeg: Vec<u8>, parameters: CompressionParameters) -> Self {
        let data_url = to_data_url(&jpeg);
        let estimated_size = estimate_encoded_size(&data_url);
        Self {
            image,
            jpeg,
            data_url,
            estimated_size,
            parameters,
        }
    }

    /// The resampled pixel buffer that was encoded.
    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width
    }

    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// Encoded JPEG bytes, suitable for a download.
    pub fn jpeg_bytes(&self) -> &[u8] {
        &self.jpeg
    }

    /// The JPEG wrapped as a base64 data URL for display.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Size estimated from the data URL payload. Not an exact file size:
    /// may exceed the JPEG length by up to 2 bytes of base64 padding.
    pub fn estimated_size(&self) -> usize {
        self.estimated_size
    }

    /// Parameters this result was produced with.
    pub fn parameters(&self) -> CompressionParameters {
        self.parameters
    }

    pub fn level(&self) -> CompressionLevel {
        self.parameters.level()
    }
}

/// Compress an already decoded source at `level`.
pub fn compress(
    source: &SourceImage,
    level: CompressionLevel,
    filter: ResampleFilter,
) -> Result<CompressedImage, CompressError> {
    let params = level.parameters();
    let (width, height) = params.target_dimensions(source.width(), source.height());

    let resized = resample(source.image(), width, height, filter)?;
    let jpeg = encode_image(&resized, params.quality_factor)?;
    let compressed = CompressedImage::new(resized, jpeg, params);

    tracing::debug!(
        name = source.name(),
        %level,
        from = ?(source.width(), source.height()),
        to = ?(width, height),
        quality = params.encoder_quality(),
        estimated_size = compressed.estimated_size(),
        "compressed image"
    );

    Ok(compressed)
}

/// Run the full pipeline, including decoding, for one input.
///
/// This is the single-image entry point; batches call the same stages per
/// item.
pub fn compress_bytes(
    input: &ImageInput,
    level: CompressionLevel,
    config: &CompressorConfig,
) -> Result<(SourceImage, CompressedImage), CompressError> {
    let source = decode_source(input, config.background)?;
    let compressed = compress(&source, level, config.filter)?;
    Ok((source, compressed))
}
