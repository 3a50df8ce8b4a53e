//! Single-image compression bindings.
//!
//! # Example
//!
//! ```typescript
//! import { compress_image, format_bytes } from '@pixpress/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_image(bytes, file.name, 60);
//! preview.src = result.data_url;
//! label.textContent = format_bytes(result.estimated_size);
//! ```

use pixpress_core::decode::ImageInput;
use pixpress_core::{estimate, naming, pipeline, CompressionLevel, CompressorConfig};
use wasm_bindgen::prelude::*;

use crate::types::{JsCompressedImage, JsDecodedImage};

/// Compress one image at `level` (clamped to 0-100) with default settings.
///
/// # Errors
///
/// Returns an error string if the bytes are not a well-formed JPEG or PNG,
/// or if resampling or encoding fails.
#[wasm_bindgen]
pub fn compress_image(bytes: &[u8], name: &str, level: i32) -> Result<JsCompressedImage, JsValue> {
    compress_with_config(bytes, name, level, &CompressorConfig::default())
        .map_err(|e| JsValue::from_str(&e))
}

/// Decode an image for display, without compressing it.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    pixpress_core::decode::decode_image(bytes, CompressorConfig::default().background)
        .map(|img| JsDecodedImage::from_decoded(&img))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Scale and quality factors for a level, as `{ scaleFactor, qualityFactor }`.
#[wasm_bindgen]
pub fn compression_parameters(level: i32) -> Result<JsValue, JsValue> {
    let params = CompressionLevel::new(i64::from(level)).parameters();
    serde_wasm_bindgen::to_value(&params).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Output dimensions for a source size at `level`, as `[width, height]`.
#[wasm_bindgen]
pub fn target_dimensions(width: u32, height: u32, level: i32) -> Vec<u32> {
    let (w, h) = CompressionLevel::new(i64::from(level))
        .parameters()
        .target_dimensions(width, height);
    vec![w, h]
}

/// Estimate the binary size behind a base64 data URL.
#[wasm_bindgen]
pub fn estimate_size(data_url: &str) -> usize {
    estimate::estimate_encoded_size(data_url)
}

/// Download name for a compressed copy, e.g. `photo-compressed.jpg`.
#[wasm_bindgen]
pub fn output_file_name(original_name: &str) -> String {
    naming::output_file_name(original_name)
}

/// Human-readable size, e.g. `1.50 KB`.
#[wasm_bindgen]
pub fn format_bytes(bytes: f64) -> String {
    naming::format_bytes(bytes.max(0.0) as u64)
}

fn compress_with_config(
    bytes: &[u8],
    name: &str,
    level: i32,
    config: &CompressorConfig,
) -> Result<JsCompressedImage, String> {
    let input = ImageInput::new(name, bytes.to_vec());
    let (_, compressed) =
        pipeline::compress_bytes(&input, CompressionLevel::new(i64::from(level)), config)
            .map_err(|e| e.to_string())?;
    Ok(JsCompressedImage::new(
        compressed,
        naming::output_file_name(name),
    ))
}
