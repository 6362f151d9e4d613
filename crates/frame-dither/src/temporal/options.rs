//! Temporal dithering options.

use serde::Deserialize;

/// Configuration for [`TemporalDither`](super::TemporalDither).
///
/// # Defaults
///
/// - `temporal_threshold`: 8 (per channel)
/// - `error_threshold`: 4 (sum over channels)
/// - `error_strength`: 1.0
/// - `warmup_rows`: 4
/// - `strips`: one per worker thread
///
/// # Example
///
/// ```
/// use frame_dither::TemporalOptions;
///
/// let options = TemporalOptions::new().temporal_threshold(12).error_strength(0.75);
/// assert_eq!(options.error_threshold, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TemporalOptions {
    /// A pixel keeps its previous index while every channel of its adjusted
    /// color is within this distance of that index's color.
    pub temporal_threshold: u32,

    /// Errors whose `|ΔR| + |ΔG| + |ΔB|` does not exceed this are not
    /// diffused.
    pub error_threshold: u32,

    /// Scale applied to freshly quantized error before diffusion.
    /// Clamped to `[0, 1]`.
    pub error_strength: f32,

    /// Rows above each strip that are re-scanned to prime its error buffer.
    pub warmup_rows: usize,

    /// Number of horizontal strips for the parallel path. `None` uses one
    /// strip per worker thread.
    pub strips: Option<usize>,
}

impl Default for TemporalOptions {
    fn default() -> Self {
        Self {
            temporal_threshold: 8,
            error_threshold: 4,
            error_strength: 1.0,
            warmup_rows: 4,
            strips: None,
        }
    }
}

impl TemporalOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn temporal_threshold(mut self, threshold: u32) -> Self {
        self.temporal_threshold = threshold;
        self
    }

    #[inline]
    pub fn error_threshold(mut self, threshold: u32) -> Self {
        self.error_threshold = threshold;
        self
    }

    #[inline]
    pub fn error_strength(mut self, strength: f32) -> Self {
        self.error_strength = strength;
        self
    }

    #[inline]
    pub fn warmup_rows(mut self, rows: usize) -> Self {
        self.warmup_rows = rows;
        self
    }

    #[inline]
    pub fn strips(mut self, strips: usize) -> Self {
        self.strips = Some(strips);
        self
    }

    /// `error_strength` as a factor over 256. NaN counts as zero.
    pub(crate) fn strength_256(&self) -> i32 {
        (self.error_strength.clamp(0.0, 1.0) * 256.0).round() as i32
    }
}
