//! Shared fixtures for unit tests.
//!
//! Palettes are cached because building the lookup table dominates the
//! runtime of most tests in debug builds.

use std::sync::{Arc, OnceLock};

use crate::color::Rgb;
use crate::palette::Palette;

pub(crate) const RED: u32 = 0xFFFF_0000;
pub(crate) const GREEN: u32 = 0xFF00_FF00;
pub(crate) const BLUE: u32 = 0xFF00_00FF;
pub(crate) const WHITE: u32 = 0xFFFF_FFFF;
pub(crate) const BLACK: u32 = 0xFF00_0000;

/// Black (0) and white (1).
pub(crate) fn black_white() -> Arc<Palette> {
    static PALETTE: OnceLock<Arc<Palette>> = OnceLock::new();
    PALETTE
        .get_or_init(|| {
            Arc::new(Palette::new(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap())
        })
        .clone()
}

/// Red (0), green (1), blue (2) and white (3).
pub(crate) fn rgbw() -> Arc<Palette> {
    static PALETTE: OnceLock<Arc<Palette>> = OnceLock::new();
    PALETTE
        .get_or_init(|| {
            Arc::new(
                Palette::new(&[
                    Rgb::new(255, 0, 0),
                    Rgb::new(0, 255, 0),
                    Rgb::new(0, 0, 255),
                    Rgb::new(255, 255, 255),
                ])
                .unwrap(),
            )
        })
        .clone()
}

/// Built-in eight color palette.
pub(crate) fn eight() -> Arc<Palette> {
    static PALETTE: OnceLock<Arc<Palette>> = OnceLock::new();
    PALETTE
        .get_or_init(|| Arc::new(Palette::eight_color()))
        .clone()
}

/// Diagonal color gradient with an alpha byte that must be ignored.
pub(crate) fn gradient(width: usize, height: usize) -> Vec<u32> {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u32;
            let g = (y * 255 / height.max(1)) as u32;
            let b = ((x + y) * 127 / (width + height).max(1)) as u32 + 64;
            pixels.push(0x4000_0000 | r << 16 | g << 8 | b);
        }
    }
    pixels
}
