//! Image encoding for Pixpress.
//!
//! Compressed output is always JPEG. The pipeline passes a quality factor in
//! `[0, 1]`; [`encode_jpeg`] is also exposed for callers that already think
//! in the encoder's 1-100 scale.

mod jpeg;

pub use jpeg::{encode_image, encode_jpeg, EncodeError};
