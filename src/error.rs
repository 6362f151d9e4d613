use std::path::PathBuf;

use frame_dither::{DitherError, PaletteError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("Dither error: {0}")]
    Dither(#[from] DitherError),

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported PNG format: {color_type} at {bit_depth} bits per sample")]
    UnsupportedFormat { color_type: String, bit_depth: u8 },

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("No PNG frames found in {}", .0.display())]
    NoFrames(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
