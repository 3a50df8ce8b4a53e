//! Image decoding for Pixpress.
//!
//! This module turns the raw bytes of a user-selected JPEG or PNG file into
//! an RGB pixel buffer with known dimensions:
//! - Format detection from magic bytes (JPEG and PNG only)
//! - EXIF orientation correction
//! - Alpha flattening over a configurable background color
//!
//! Decoding either succeeds on the full byte stream or fails; it never
//! returns a partially decoded buffer.

mod raster;
mod types;

pub use raster::{decode_image, decode_source, detect_format};
pub use types::{DecodeError, DecodedImage, ImageInput, Orientation, SourceImage};
