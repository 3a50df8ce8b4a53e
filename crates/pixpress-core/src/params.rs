//! Mapping from the single user-facing compression level to resampling and
//! encoder parameters.
//!
//! One level drives both geometry and fidelity:
//!
//! ```text
//! shrink        = level / 100
//! scale_factor  = 1 - shrink * 0.8     (1.0 at level 0, 0.2 at level 100)
//! quality_factor = 1 - shrink          (1.0 at level 0, 0.0 at level 100)
//! ```
//!
//! Output dimensions are `ceil(original * scale_factor)`, never below 1.
//! They are computed in integer arithmetic so that, for example, 1000 px at
//! level 60 is exactly 520 px rather than 521 from a float rounding error.

use serde::{Deserialize, Serialize};

/// Fraction of the linear size kept at the maximum level.
const MIN_SCALE_PERCENT: u64 = 20;

/// Integer compression level, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    pub const MIN: CompressionLevel = CompressionLevel(0);
    pub const MAX: CompressionLevel = CompressionLevel(100);
    /// Level a fresh or reset batch starts at.
    pub const DEFAULT: CompressionLevel = CompressionLevel(60);

    /// Create a level, clamping out-of-range values into `0..=100`.
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Derive the resampling and encoder parameters for this level.
    pub fn parameters(self) -> CompressionParameters {
        CompressionParameters::from_level(self)
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i64> for CompressionLevel {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<CompressionLevel> for u8 {
    fn from(level: CompressionLevel) -> Self {
        level.0
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Parameters derived from a [`CompressionLevel`].
///
/// Never cached: recompute from the level for every compression request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionParameters {
    level: CompressionLevel,
    /// Linear scale applied to each axis, in `[0.2, 1.0]`.
    pub scale_factor: f64,
    /// Encoder fidelity, in `[0.0, 1.0]`.
    pub quality_factor: f64,
}

impl CompressionParameters {
    pub fn from_level(level: CompressionLevel) -> Self {
        let shrink = f64::from(level.value()) / 100.0;
        Self {
            level,
            scale_factor: 1.0 - shrink * 0.8,
            quality_factor: 1.0 - shrink,
        }
    }

    /// The level these parameters were derived from.
    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    /// Output dimensions for a source of `width` x `height`.
    ///
    /// Each axis is `ceil(axis * scale_factor)`, floored at 1 and never larger
    /// than the source axis.
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        (self.scale_axis(width), self.scale_axis(height))
    }

    fn scale_axis(&self, axis: u32) -> u32 {
        // scale_factor == keep / 500 exactly, with keep in [100, 500]
        let keep = 500 - 4 * u64::from(self.level.value());
        debug_assert!(keep >= MIN_SCALE_PERCENT * 5);
        let scaled = (u64::from(axis) * keep).div_ceil(500);
        // scaled <= axis because keep <= 500
        (scaled as u32).max(1)
    }

    /// Quality on the encoder's 1-100 scale.
    ///
    /// Monotonic in `quality_factor`; zero quality maps to the encoder's floor of 1.
    pub fn encoder_quality(&self) -> u8 {
        quality_factor_to_encoder(self.quality_factor)
    }
}

/// Map a quality factor in `[0, 1]` onto the JPEG encoder's 1-100 scale.
///
/// Non-finite factors are treated as zero.
pub fn quality_factor_to_encoder(quality_factor: f64) -> u8 {
    let q = if quality_factor.is_finite() {
        quality_factor.clamp(0.0, 1.0)
    } else {
        0.0
    };
    ((q * 100.0).round() as u8).clamp(1, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_level_clamps() {
        assert_eq!(CompressionLevel::new(-5).value(), 0);
        assert_eq!(CompressionLevel::new(150).value(), 100);
        assert_eq!(CompressionLevel::new(42).value(), 42);
        assert_eq!(CompressionLevel::default().value(), 60);
    }

    #[test]
    fn test_level_zero_is_identity() {
        let params = CompressionLevel::new(0).parameters();
        assert!(approx_eq(params.scale_factor, 1.0));
        assert!(approx_eq(params.quality_factor, 1.0));
        assert_eq!(params.target_dimensions(640, 480), (640, 480));
        assert_eq!(params.encoder_quality(), 100);
    }

    #[test]
    fn test_level_hundred_is_maximum_shrink() {
        let params = CompressionLevel::new(100).parameters();
        assert!(approx_eq(params.scale_factor, 0.2));
        assert!(approx_eq(params.quality_factor, 0.0));
        assert_eq!(params.target_dimensions(1000, 500), (200, 100));
        assert_eq!(params.encoder_quality(), 1);
    }

    #[test]
    fn test_level_sixty_on_1000_square() {
        let params = CompressionLevel::new(60).parameters();
        assert!(approx_eq(params.scale_factor, 0.52));
        assert!(approx_eq(params.quality_factor, 0.4));
        assert_eq!(params.target_dimensions(1000, 1000), (520, 520));
        assert_eq!(params.encoder_quality(), 40);
    }

    #[test]
    fn test_dimensions_round_up() {
        // 7 * 0.52 = 3.64 -> 4
        let params = CompressionLevel::new(60).parameters();
        assert_eq!(params.target_dimensions(7, 3), (4, 2));
    }

    #[test]
    fn test_dimensions_floor_at_one() {
        let params = CompressionLevel::MAX.parameters();
        assert_eq!(params.target_dimensions(1, 1), (1, 1));
        assert_eq!(params.target_dimensions(0, 4), (1, 1));
    }

    #[test]
    fn test_quality_factor_mapping() {
        assert_eq!(quality_factor_to_encoder(1.0), 100);
        assert_eq!(quality_factor_to_encoder(0.0), 1);
        assert_eq!(quality_factor_to_encoder(0.5), 50);
        assert_eq!(quality_factor_to_encoder(2.0), 100);
        assert_eq!(quality_factor_to_encoder(f64::NAN), 1);
    }

    #[test]
    fn test_level_from_i64_clamps() {
        assert_eq!(CompressionLevel::from(250), CompressionLevel::MAX);
        assert_eq!(u8::from(CompressionLevel::from(7)), 7);
    }

    #[test]
    fn test_level_display() {
        assert_eq!(CompressionLevel::new(60).to_string(), "60%");
    }
}
