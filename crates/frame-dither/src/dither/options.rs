//! Dithering options and configuration.

use serde::Deserialize;

/// Configuration shared by every dithering algorithm.
///
/// # Example
///
/// ```
/// use frame_dither::DitherOptions;
///
/// let options = DitherOptions::new().serpentine(false);
/// assert!(!options.serpentine);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DitherOptions {
    /// Enable serpentine scanning (alternating row direction).
    ///
    /// When enabled, odd rows are processed right-to-left and the diffusion
    /// kernel is horizontally mirrored.
    ///
    /// Default: `true`
    pub serpentine: bool,
}

impl Default for DitherOptions {
    fn default() -> Self {
        Self { serpentine: true }
    }
}

impl DitherOptions {
    /// Create new dither options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set serpentine scanning mode.
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    /// Whether row `y` is scanned right-to-left.
    #[inline]
    pub(crate) fn reversed(&self, y: usize) -> bool {
        self.serpentine && y % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        assert!(DitherOptions::default().serpentine);
        assert_eq!(DitherOptions::new(), DitherOptions::default());
    }

    #[test]
    fn test_reversed_rows() {
        let options = DitherOptions::new();
        assert!(!options.reversed(0));
        assert!(options.reversed(1));
        assert!(!options.reversed(2));
        assert!(!options.serpentine(false).reversed(1));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let options: DitherOptions = serde_json::from_str("{}").unwrap();
        assert!(options.serpentine);
        let options: DitherOptions = serde_json::from_str(r#"{"serpentine": false}"#).unwrap();
        assert!(!options.serpentine);
    }
}
