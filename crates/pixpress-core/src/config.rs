//! Compressor configuration.

use serde::{Deserialize, Serialize};

use crate::params::CompressionLevel;
use crate::resample::ResampleFilter;

/// Advisory per-file ceiling: 10 MiB.
pub const DEFAULT_MAX_SOURCE_BYTES: usize = 10 * 1024 * 1024;

/// Settings shared by every item in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressorConfig {
    /// Level used for new batches and restored on reset.
    pub default_level: CompressionLevel,
    /// Largest accepted source file in bytes. Checked when items are added.
    pub max_source_bytes: usize,
    /// Worker threads for batch runs. 0 means one per available core.
    pub concurrency: usize,
    /// Interpolation used when shrinking.
    pub filter: ResampleFilter,
    /// Color transparent pixels are composited over before encoding.
    pub background: [u8; 3],
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            default_level: CompressionLevel::DEFAULT,
            max_source_bytes: DEFAULT_MAX_SOURCE_BYTES,
            concurrency: 0,
            filter: ResampleFilter::default(),
            // Matches a canvas JPEG export
            background: [0, 0, 0],
        }
    }
}

impl CompressorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of workers a batch run should use.
    pub fn effective_concurrency(&self) -> usize {
        if self.concurrency > 0 {
            return self.concurrency;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompressorConfig::new();
        assert_eq!(config.default_level.value(), 60);
        assert_eq!(config.max_source_bytes, 10_485_760);
        assert_eq!(config.filter, ResampleFilter::Bilinear);
        assert_eq!(config.background, [0, 0, 0]);
    }

    #[test]
    fn test_effective_concurrency() {
        let mut config = CompressorConfig::new();
        assert!(config.effective_concurrency() >= 1);

        config.concurrency = 3;
        assert_eq!(config.effective_concurrency(), 3);
    }
}
