//! Palette dithering algorithms.
//!
//! # Algorithms
//!
//! Seven error diffusion kernels share one serpentine driver:
//!
//! - **Floyd-Steinberg**: classic 4-tap kernel (default)
//! - **Atkinson**: 75% propagation, crisp on small palettes
//! - **Burkes**, **Stucki**, **Jarvis-Judice-Ninke**: wider kernels
//! - **Stevenson-Arce**: sparse 12-tap kernel reaching three rows down
//! - **Filter Lite**: minimal 3-tap kernel with a specialized fast path
//!
//! Three non-diffusing algorithms implement the same contract: plain
//! nearest-color mapping, Bayer ordered dithering and seeded random noise.
//!
//! # Architecture
//!
//! All algorithms implement the [`Dither`] trait. Error diffusion is driven
//! by a [`Kernel`] weight table; the scan itself lives in one place.

mod diffusion;
mod fast_path;
mod kernel;
mod nearest;
mod options;
mod ordered;
mod random;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

pub use diffusion::ErrorDiffusionDither;
pub use fast_path::{fast_path_available, Backend, PORTABLE_ENV};
pub use kernel::*;
pub use nearest::NearestDither;
pub use options::DitherOptions;
pub use ordered::{BayerSize, OrderedDither};
pub use random::{RandomDither, DEFAULT_SEED};

use crate::api::DitherError;
use crate::palette::Palette;

/// Dither algorithm selection for the builder API and configuration files.
///
/// Names are kebab case: `floyd-steinberg`, `bayer-4`, `random`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum DitherAlgorithm {
    /// Floyd-Steinberg error diffusion.
    #[default]
    FloydSteinberg,
    /// Atkinson error diffusion (75% propagation).
    Atkinson,
    /// Burkes error diffusion.
    Burkes,
    /// Stucki error diffusion.
    Stucki,
    /// Jarvis-Judice-Ninke error diffusion.
    JarvisJudiceNinke,
    /// Stevenson-Arce error diffusion.
    StevensonArce,
    /// Filter Lite error diffusion.
    FilterLite,
    /// Nearest palette color, no dithering.
    Nearest,
    /// Ordered dithering with a 2×2 Bayer matrix.
    Bayer2,
    /// Ordered dithering with a 4×4 Bayer matrix.
    Bayer4,
    /// Ordered dithering with an 8×8 Bayer matrix.
    Bayer8,
    /// Uniform random noise before resolution.
    Random,
}

impl DitherAlgorithm {
    /// Every algorithm, error diffusion kernels first.
    pub const ALL: [DitherAlgorithm; 12] = [
        DitherAlgorithm::FloydSteinberg,
        DitherAlgorithm::Atkinson,
        DitherAlgorithm::Burkes,
        DitherAlgorithm::Stucki,
        DitherAlgorithm::JarvisJudiceNinke,
        DitherAlgorithm::StevensonArce,
        DitherAlgorithm::FilterLite,
        DitherAlgorithm::Nearest,
        DitherAlgorithm::Bayer2,
        DitherAlgorithm::Bayer4,
        DitherAlgorithm::Bayer8,
        DitherAlgorithm::Random,
    ];

    /// Kebab case name used by [`FromStr`] and [`Display`](fmt::Display).
    pub fn name(self) -> &'static str {
        match self {
            DitherAlgorithm::FloydSteinberg => "floyd-steinberg",
            DitherAlgorithm::Atkinson => "atkinson",
            DitherAlgorithm::Burkes => "burkes",
            DitherAlgorithm::Stucki => "stucki",
            DitherAlgorithm::JarvisJudiceNinke => "jarvis-judice-ninke",
            DitherAlgorithm::StevensonArce => "stevenson-arce",
            DitherAlgorithm::FilterLite => "filter-lite",
            DitherAlgorithm::Nearest => "nearest",
            DitherAlgorithm::Bayer2 => "bayer-2",
            DitherAlgorithm::Bayer4 => "bayer-4",
            DitherAlgorithm::Bayer8 => "bayer-8",
            DitherAlgorithm::Random => "random",
        }
    }

    /// Diffusion kernel, for error diffusion algorithms.
    pub fn kernel(self) -> Option<Kernel> {
        match self {
            DitherAlgorithm::FloydSteinberg => Some(FLOYD_STEINBERG),
            DitherAlgorithm::Atkinson => Some(ATKINSON),
            DitherAlgorithm::Burkes => Some(BURKES),
            DitherAlgorithm::Stucki => Some(STUCKI),
            DitherAlgorithm::JarvisJudiceNinke => Some(JARVIS_JUDICE_NINKE),
            DitherAlgorithm::StevensonArce => Some(STEVENSON_ARCE),
            DitherAlgorithm::FilterLite => Some(FILTER_LITE),
            _ => None,
        }
    }
}

impl fmt::Display for DitherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown algorithm name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dithering algorithm `{0}`")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for DitherAlgorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

impl TryFrom<String> for DitherAlgorithm {
    type Error = UnknownAlgorithm;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Noise level for ordered and random dithering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoiseStrength {
    /// Half the default amplitude.
    Light,
    /// Default amplitude.
    #[default]
    Normal,
    /// Twice the default amplitude.
    Heavy,
}

/// Trait for palette dithering algorithms.
///
/// Both operations scan the frame identically; they differ only in what is
/// written for each pixel.
///
/// # Panics
///
/// Both methods panic if `width` is zero or the buffer length is not a
/// multiple of `width`. The builder's `try_` methods report the same
/// condition as a [`DitherError`] instead.
pub trait Dither: Send + Sync {
    /// Palette the output is restricted to.
    fn palette(&self) -> &Palette;

    /// Replace every pixel with the opaque palette color chosen for it.
    fn dither_in_place(&self, buffer: &mut [u32], width: usize);

    /// Palette index for every pixel, row-major. `buffer` is not modified.
    fn dither_to_indices(&self, buffer: &[u32], width: usize) -> Vec<u8>;
}

/// Height of a frame of `len` pixels, or an error if `width` does not divide it.
pub fn checked_height(len: usize, width: usize) -> Result<usize, DitherError> {
    if width == 0 || len % width != 0 {
        return Err(DitherError::InvalidDimensions { len, width });
    }
    Ok(len / width)
}

/// Like [`checked_height`], but a bad shape is a caller bug.
pub(crate) fn frame_height(len: usize, width: usize) -> usize {
    match checked_height(len, width) {
        Ok(height) => height,
        Err(e) => panic!("{e}"),
    }
}

/// Where a scan reads pixels from and writes its decisions to.
pub(crate) trait Frame {
    fn pixel(&self, idx: usize) -> u32;
    fn emit(&mut self, idx: usize, index: u8, palette: &Palette);
}

/// Overwrites each pixel with its palette color.
pub(crate) struct InPlace<'a>(pub &'a mut [u32]);

impl Frame for InPlace<'_> {
    #[inline]
    fn pixel(&self, idx: usize) -> u32 {
        self.0[idx]
    }

    #[inline]
    fn emit(&mut self, idx: usize, index: u8, palette: &Palette) {
        self.0[idx] = palette.packed(index as usize);
    }
}

/// Reads an untouched input and records indices.
pub(crate) struct ToIndices<'a> {
    pub pixels: &'a [u32],
    pub out: &'a mut [u8],
}

impl Frame for ToIndices<'_> {
    #[inline]
    fn pixel(&self, idx: usize) -> u32 {
        self.pixels[idx]
    }

    #[inline]
    fn emit(&mut self, idx: usize, index: u8, _palette: &Palette) {
        self.out[idx] = index;
    }
}

/// Sliding window of pending per-channel error.
///
/// Holds only the rows the kernel can reach: `rows[0]` is the current row,
/// `rows[1]` the next one, and so on.
///
/// # Usage Pattern
///
/// 1. Create buffer with `new(width, kernel.max_dy + 1)`
/// 2. For each row:
///    a. Read pending error with `accumulated(x)`
///    b. After resolving the pixel, spread its error with `diffuse(..)`
///    c. After the row is complete, call `advance_row()`
#[derive(Debug)]
pub(crate) struct ErrorBuffer {
    rows: Vec<Vec<[i32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    pub(crate) fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0; 3]; width]).collect(),
            width,
        }
    }

    /// Error pending for column `x` of the current row.
    #[inline]
    pub(crate) fn accumulated(&self, x: usize) -> [i32; 3] {
        self.rows[0][x]
    }

    /// Spread `delta` from column `x` of the current row.
    ///
    /// Taps left of column 0, right of the last column, or more than
    /// `rows_below` rows down are dropped.
    #[inline]
    pub(crate) fn diffuse(
        &mut self,
        kernel: &Kernel,
        x: usize,
        reverse: bool,
        rows_below: usize,
        delta: [i32; 3],
    ) {
        if delta == [0; 3] {
            return;
        }
        for &(dx, dy, weight) in kernel.entries {
            let dy = dy as usize;
            if dy > rows_below {
                continue;
            }
            let dx = if reverse { -dx } else { dx };
            let nx = x as isize + dx as isize;
            if nx < 0 || nx as usize >= self.width {
                continue;
            }
            let cell = &mut self.rows[dy][nx as usize];
            for c in 0..3 {
                cell[c] += kernel.share(delta[c], weight);
            }
        }
    }

    /// Rotate the window down one row and zero the new last row.
    pub(crate) fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0; 3]);
        }
    }
}

/// Per-channel quantization error of an adjusted color against a palette entry.
#[inline]
pub(crate) fn delta(adjusted: [i32; 3], chosen: [i32; 3]) -> [i32; 3] {
    [
        adjusted[0] - chosen[0],
        adjusted[1] - chosen[1],
        adjusted[2] - chosen[2],
    ]
}

/// Core error diffusion loop, parameterized by kernel.
///
/// Rows run top to bottom; with serpentine scanning, odd rows run
/// right-to-left and the kernel is mirrored. Each pixel gets its pending
/// error added and clamped to `[0, 255]`, is resolved to the nearest palette
/// color, and the remaining difference is spread with the kernel.
pub(crate) fn diffuse_frame<F: Frame>(
    frame: &mut F,
    width: usize,
    height: usize,
    palette: &Palette,
    kernel: &Kernel,
    options: &DitherOptions,
) {
    let mut errors = ErrorBuffer::new(width, kernel.max_dy + 1);

    for y in 0..height {
        let reverse = options.reversed(y);
        let rows_below = height - y - 1;

        for step in 0..width {
            let x = if reverse { width - 1 - step } else { step };
            let idx = y * width + x;

            let adjusted = crate::color::adjust(frame.pixel(idx), errors.accumulated(x));
            let index = palette.resolve(adjusted);
            frame.emit(idx, index, palette);

            let chosen = palette.color(index as usize).to_i32();
            errors.diffuse(kernel, x, reverse, rows_below, delta(adjusted, chosen));
        }

        errors.advance_row();
    }
}
