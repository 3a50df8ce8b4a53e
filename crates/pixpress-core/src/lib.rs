//! Pixpress Core - local image compression pipeline
//!
//! This crate turns user-selected JPEG/PNG files into smaller JPEGs, driven
//! by a single compression level (0-100) that controls both how much the
//! image is shrunk and how coarsely it is quantized.
//!
//! # Pipeline
//!
//! ```text
//! raw bytes -> decode -> parameters(level) -> resample -> encode -> estimate
//! ```
//!
//! - [`decode`] - JPEG/PNG bytes to an RGB pixel buffer
//! - [`params`] - compression level to scale and quality factors
//! - [`resample`] - filtered downscaling
//! - [`encode`] - JPEG encoding
//! - [`estimate`] - data URL wrapping and size estimation
//! - [`pipeline`] - the stages composed into one call
//! - [`batch`] - the pipeline over many images, with per-item isolation
//!
//! Logging goes through `tracing`; install a subscriber in the host to see it.

pub mod batch;
pub mod config;
pub mod decode;
pub mod encode;
pub mod estimate;
pub mod naming;
pub mod params;
pub mod pipeline;
pub mod resample;

pub use batch::{BatchCoordinator, BatchError, BatchItem, BatchReport, CancellationToken, ItemOutcome};
pub use config::CompressorConfig;
pub use decode::{DecodeError, DecodedImage, ImageInput, SourceImage};
pub use encode::EncodeError;
pub use params::{CompressionLevel, CompressionParameters};
pub use pipeline::{compress, compress_bytes, CompressError, CompressedImage};
pub use resample::{ResampleError, ResampleFilter};
