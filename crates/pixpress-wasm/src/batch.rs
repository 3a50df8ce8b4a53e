//! Batch bindings: a working set of images compressed at one shared level.
//!
//! # Example
//!
//! ```typescript
//! import { JsBatch } from '@pixpress/wasm';
//!
//! const batch = new JsBatch();
//! for (const file of input.files) {
//!   batch.add(new Uint8Array(await file.arrayBuffer()), file.name);
//! }
//! batch.level = 60;
//! const summaries = batch.compress_all();
//! ```
//!
//! Batch runs are sequential inside WASM; run the batch in a Web Worker to
//! keep the page responsive.

use pixpress_core::batch::{BatchCoordinator, BatchReport, ItemOutcome};
use pixpress_core::decode::ImageInput;
use pixpress_core::CompressorConfig;
use wasm_bindgen::prelude::*;

use crate::types::{ItemSummary, JsCompressedImage, JsDecodedImage};

/// An ordered set of images sharing one compression level.
#[wasm_bindgen]
pub struct JsBatch {
    inner: BatchCoordinator,
}

impl Default for JsBatch {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsBatch {
    /// Create an empty batch with default settings (level 60, 10MB limit).
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsBatch {
        JsBatch {
            inner: BatchCoordinator::new(),
        }
    }

    /// Create an empty batch from a config object, e.g.
    /// `{ defaultLevel: 50, maxSourceBytes: 5242880, filter: "lanczos3" }`.
    /// Missing fields take their defaults.
    pub fn with_config(config: JsValue) -> Result<JsBatch, JsValue> {
        let config: CompressorConfig =
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(JsBatch {
            inner: BatchCoordinator::with_config(config),
        })
    }

    /// Current compression level (0-100).
    #[wasm_bindgen(getter)]
    pub fn level(&self) -> u8 {
        self.inner.level().value()
    }

    /// Set the compression level. Out-of-range values are clamped.
    #[wasm_bindgen(setter)]
    pub fn set_level(&mut self, level: i32) {
        self.inner.set_level(i64::from(level));
    }

    /// Number of items in the batch.
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    /// Add one file. Returns its index.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is larger than the configured limit.
    pub fn add(&mut self, bytes: Vec<u8>, name: String) -> Result<usize, JsValue> {
        self.inner
            .add_item(ImageInput::new(name, bytes))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace every item with a single new file (single-image mode).
    pub fn replace(&mut self, bytes: Vec<u8>, name: String) -> Result<usize, JsValue> {
        self.inner
            .replace_all([ImageInput::new(name, bytes)])
            .remove(0)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Remove the item at `index`. Later items shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<(), JsValue> {
        self.inner
            .remove(index)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Remove every item and restore the default level.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Decode every new item so originals can be displayed.
    /// Returns the item summaries.
    pub fn load_previews(&mut self) -> Result<JsValue, JsValue> {
        let report = self.inner.load_previews();
        log_failures(&report);
        self.summaries()
    }

    /// Compress every item at the current level, replacing earlier results.
    /// Returns the item summaries; failed items carry an `error` string.
    pub fn compress_all(&mut self) -> Result<JsValue, JsValue> {
        let report = self.inner.compress_all();
        log_failures(&report);
        self.summaries()
    }

    /// Array of plain objects describing every item, in order.
    pub fn summaries(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.collect_summaries())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Decoded original of the item at `index`, if it has been decoded.
    pub fn original(&self, index: usize) -> Option<JsDecodedImage> {
        self.inner
            .item(index)
            .and_then(|item| item.source())
            .map(|source| JsDecodedImage::from_decoded(source.image()))
    }

    /// Latest compression result of the item at `index`, if any.
    pub fn compressed(&self, index: usize) -> Option<JsCompressedImage> {
        let item = self.inner.item(index)?;
        item.compressed()
            .map(|c| JsCompressedImage::new(c.clone(), item.download_name()))
    }

    /// Download names of all items, in order.
    pub fn download_names(&self) -> js_sys::Array {
        self.inner
            .items()
            .iter()
            .map(|item| JsValue::from_str(&item.download_name()))
            .collect()
    }
}

impl JsBatch {
    fn collect_summaries(&self) -> Vec<ItemSummary> {
        self.inner
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| ItemSummary::from_item(index, item))
            .collect()
    }
}

/// Surface per-item failures in the browser console.
fn log_failures(report: &BatchReport) {
    for item in &report.items {
        if let ItemOutcome::Failed(err) = &item.outcome {
            let message = format!("pixpress: could not compress {}: {}", item.name, err);
            web_sys::console::warn_1(&JsValue::from_str(&message));
        }
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use pixpress_core::encode::encode_jpeg;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_add_remove_compress() {
        let jpeg = encode_jpeg(&vec![100u8; 20 * 20 * 3], 20, 20, 90).unwrap();
        let mut batch = JsBatch::new();
        assert_eq!(batch.add(jpeg.clone(), "one.jpg".into()).unwrap(), 0);
        assert_eq!(batch.add(jpeg, "two.jpg".into()).unwrap(), 1);

        batch.remove(0).unwrap();
        assert_eq!(batch.length(), 1);
        assert!(batch.remove(3).is_err());

        assert!(batch.compress_all().is_ok());
        assert_eq!(batch.compressed(0).unwrap().width(), 11);
        assert_eq!(batch.download_names().length(), 1);
    }

    #[wasm_bindgen_test]
    fn test_with_config() {
        let config = serde_wasm_bindgen::to_value(&CompressorConfig::default()).unwrap();
        let batch = JsBatch::with_config(config).unwrap();
        assert_eq!(batch.level(), 60);
    }
}
