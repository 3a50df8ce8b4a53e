//! WASM-compatible wrapper types for image data.
//!
//! These types wrap the core Pixpress types and handle the conversion
//! between Rust and JavaScript data representations.

use pixpress_core::batch::BatchItem;
use pixpress_core::decode::DecodedImage;
use pixpress_core::pipeline::CompressedImage;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A decoded RGB image for display in JavaScript.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory. Calling `pixels()` copies it into a
/// JavaScript `Uint8Array`.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create a new JsDecodedImage from dimensions and RGB pixel data.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Returns the pixels expanded to RGBA, ready for `new ImageData(...)`.
    pub fn rgba_pixels(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() / 3 * 4);
        for px in self.pixels.chunks_exact(3) {
            out.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        out
    }
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: &DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels.clone(),
        }
    }
}

/// One compression result for JavaScript.
#[wasm_bindgen]
pub struct JsCompressedImage {
    inner: CompressedImage,
    download_name: String,
}

#[wasm_bindgen]
impl JsCompressedImage {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Estimated compressed size in bytes (from the data URL length).
    #[wasm_bindgen(getter)]
    pub fn estimated_size(&self) -> usize {
        self.inner.estimated_size()
    }

    /// Level the image was compressed at.
    #[wasm_bindgen(getter)]
    pub fn level(&self) -> u8 {
        self.inner.level().value()
    }

    /// `data:image/jpeg;base64,...` for an `<img src>` or download link.
    #[wasm_bindgen(getter)]
    pub fn data_url(&self) -> String {
        self.inner.data_url().to_string()
    }

    /// Suggested file name for the download, e.g. `photo-compressed.jpg`.
    #[wasm_bindgen(getter)]
    pub fn download_name(&self) -> String {
        self.download_name.clone()
    }

    /// JPEG bytes as Uint8Array (copied), for a Blob download.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.jpeg_bytes().to_vec()
    }

    /// The resampled pixels that were encoded.
    pub fn image(&self) -> JsDecodedImage {
        JsDecodedImage::from_decoded(self.inner.image())
    }
}

impl JsCompressedImage {
    pub(crate) fn new(inner: CompressedImage, download_name: String) -> Self {
        Self {
            inner,
            download_name,
        }
    }
}

/// Plain-object view of a batch item, serialized with serde-wasm-bindgen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemSummary {
    pub index: usize,
    pub name: String,
    pub original_size: usize,
    pub original_width: Option<u32>,
    pub original_height: Option<u32>,
    pub compressed_width: Option<u32>,
    pub compressed_height: Option<u32>,
    pub estimated_size: Option<usize>,
    pub level: Option<u8>,
    pub download_name: String,
    pub error: Option<String>,
}

impl ItemSummary {
    pub(crate) fn from_item(index: usize, item: &BatchItem) -> Self {
        let source = item.source();
        let compressed = item.compressed();
        Self {
            index,
            name: item.name().to_string(),
            original_size: item.original_size(),
            original_width: source.map(|s| s.width()),
            original_height: source.map(|s| s.height()),
            compressed_width: compressed.map(CompressedImage::width),
            compressed_height: compressed.map(CompressedImage::height),
            estimated_size: compressed.map(CompressedImage::estimated_size),
            level: compressed.map(|c| c.level().value()),
            download_name: item.download_name(),
            error: item.error().map(|e| e.to_string()),
        }
    }
}
