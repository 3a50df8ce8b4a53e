//! Pixpress WASM - WebAssembly bindings for Pixpress
//!
//! This crate exposes the pixpress-core compression pipeline to a
//! JavaScript/TypeScript front end. Everything runs locally in the page;
//! images never leave the device.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrappers for decoded and compressed images
//! - `compress` - Single-image compression and helper functions
//! - `batch` - A working set of images compressed at a shared level
//!
//! # Usage
//!
//! ```typescript
//! import init, { compress_image } from '@pixpress/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_image(bytes, file.name, 60);
//! console.log(`${result.width}x${result.height}, ~${result.estimated_size} bytes`);
//! ```

use wasm_bindgen::prelude::*;

mod batch;
mod compress;
mod types;

pub use batch::JsBatch;
pub use compress::{
    compress_image, compression_parameters, decode_image, estimate_size, format_bytes,
    output_file_name, target_dimensions,
};
pub use types::{JsCompressedImage, JsDecodedImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Default compression level for new and reset batches.
#[wasm_bindgen]
pub fn default_level() -> u8 {
    pixpress_core::CompressionLevel::DEFAULT.value()
}
