//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No bytes were supplied.
    #[error("Empty input: no image bytes")]
    EmptyInput,

    /// The bytes are a recognized format that Pixpress does not accept.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The file format is not recognized at all.
    #[error("Invalid or unrecognized image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The decoder produced an image with no pixels.
    #[error("Decoded image has zero dimensions ({width}x{height})")]
    ZeroDimensions { width: u32, height: u32 },
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A decoded image with RGB pixel data.
///
/// This is the pixel buffer passed between pipeline stages. Every stage
/// returns a new `DecodedImage`; none mutates its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Number of bytes per pixel in the fixed RGB8 layout.
    pub const CHANNELS: usize = 3;

    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            Self::expected_len(width, height),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Borrow the pixels as an image::RgbImage view without copying.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn as_rgb_view(&self) -> Option<image::ImageBuffer<image::Rgb<u8>, &[u8]>> {
        image::ImageBuffer::from_raw(self.width, self.height, self.pixels.as_slice())
    }

    /// Buffer length required for the given dimensions.
    pub fn expected_len(width: u32, height: u32) -> usize {
        (width as usize) * (height as usize) * Self::CHANNELS
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

/// Raw bytes of one user-selected file, before decoding.
///
/// The bytes are kept for the lifetime of the batch item so a failed item can
/// still be shown (or retried at another level) by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    /// Original file name, including its extension.
    pub name: String,
    /// Undecoded file contents.
    pub bytes: Vec<u8>,
}

impl ImageInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Size of the original file in bytes.
    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }
}

/// A successfully decoded source image.
///
/// Immutable once created; compression runs read it and never write to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    image: DecodedImage,
    original_size: usize,
    name: String,
}

impl SourceImage {
    pub fn new(image: DecodedImage, original_size: usize, name: impl Into<String>) -> Self {
        Self {
            image,
            original_size,
            name: name.into(),
        }
    }

    /// The decoded pixel buffer, suitable for display.
    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width
    }

    pub fn height(&self) -> u32 {
        self.image.height
    }

    /// Size of the original encoded file in bytes.
    pub fn original_size(&self) -> usize {
        self.original_size
    }

    /// Original file name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
