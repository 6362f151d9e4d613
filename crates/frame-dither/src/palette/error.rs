//! Error types for palette operations

use std::num::ParseIntError;

use thiserror::Error;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] ParseIntError),
}

/// Error type for palette construction.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// No colors provided
    #[error("palette cannot be empty")]
    Empty,
    /// More colors than fit into a `u8` index
    #[error("palette has {len} colors, at most 256 are supported")]
    TooManyColors {
        /// Number of colors supplied
        len: usize,
    },
    /// Duplicate color found at the specified index
    #[error("duplicate color found at index {index}")]
    DuplicateColor {
        /// Index where the duplicate was found
        index: usize,
    },
    /// Invalid hex color string
    #[error("invalid color: {0}")]
    ParseColor(#[from] ParseColorError),
    /// A palette table entry is not an `[r, g, b]` triple
    #[error("palette entry {index} must be an [r, g, b] triple")]
    InvalidEntry {
        /// Index of the malformed entry
        index: usize,
    },
    /// Palette table is not valid JSON
    #[error("invalid palette table: {0}")]
    Json(#[from] serde_json::Error),
}
