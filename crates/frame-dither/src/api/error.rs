//! Unified error type for the frame-dither public API.

use thiserror::Error;

use crate::dither::DitherAlgorithm;
use crate::palette::{PaletteError, ParseColorError};

/// Unified error type for the frame-dither public API.
///
/// # Example
///
/// ```
/// use frame_dither::{DitherError, Palette};
///
/// fn create_palette() -> Result<Palette, DitherError> {
///     let palette = Palette::from_hex(&["#000000", "#FFFFFF"])?;
///     Ok(palette)
/// }
/// # create_palette().unwrap();
/// ```
#[derive(Debug, Error)]
pub enum DitherError {
    /// Palette validation or loading error
    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),
    /// Color parsing error (invalid hex string)
    #[error("color parse error: {0}")]
    ParseColor(#[from] ParseColorError),
    /// Buffer length is not a whole number of rows
    #[error("buffer of {len} pixels cannot be split into rows of width {width}")]
    InvalidDimensions { len: usize, width: usize },
    /// Externally supplied previous frame has the wrong length
    #[error("previous frame has {actual} indices, expected {expected}")]
    SnapshotLength { expected: usize, actual: usize },
    /// Temporal dithering needs an error diffusion kernel
    #[error("`{0}` does not diffuse error and cannot be used for temporal dithering")]
    NotErrorDiffusion(DitherAlgorithm),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DitherError::InvalidDimensions { len: 10, width: 3 }.to_string(),
            "buffer of 10 pixels cannot be split into rows of width 3"
        );
        assert_eq!(
            DitherError::SnapshotLength {
                expected: 4,
                actual: 3
            }
            .to_string(),
            "previous frame has 3 indices, expected 4"
        );
        assert_eq!(
            DitherError::NotErrorDiffusion(DitherAlgorithm::Bayer4).to_string(),
            "`bayer-4` does not diffuse error and cannot be used for temporal dithering"
        );
    }

    #[test]
    fn test_from_palette_error() {
        let err: DitherError = PaletteError::Empty.into();
        assert_eq!(err.to_string(), "palette error: palette cannot be empty");
    }
}
