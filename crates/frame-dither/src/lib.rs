#![allow(clippy::needless_range_loop, clippy::module_inception)]

//! frame-dither: palette quantization and error diffusion for video frames
//!
//! Converts flat buffers of packed `0x??RRGGBB` pixels into indices into a
//! small fixed palette (at most 256 colors), spreading quantization error to
//! neighboring pixels to preserve perceived detail.
//!
//! # Quick Start
//!
//! The [`Ditherer`] builder is the primary entry point:
//!
//! ```
//! use frame_dither::{Ditherer, Palette, Rgb};
//!
//! let palette = Palette::new(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
//! let ditherer = Ditherer::new(palette);
//!
//! let pixels = vec![0xFF808080; 16];
//! let indices = ditherer.try_dither_to_indices(&pixels, 4).unwrap();
//! assert_eq!(indices.len(), 16);
//! ```
//!
//! # Video Streams
//!
//! [`TemporalDither`] keeps the previous frame's indices and reuses them for
//! pixels whose color has not moved, so static regions do not flicker:
//!
//! ```
//! use frame_dither::{DitherAlgorithm, Ditherer, Palette, TemporalOptions};
//!
//! let palette = Palette::eight_color();
//! let mut stream = Ditherer::new(palette)
//!     .algorithm(DitherAlgorithm::FilterLite)
//!     .temporal(TemporalOptions::default())
//!     .unwrap();
//!
//! let frame = vec![0xFF336699; 64 * 48];
//! let first = stream.dither_to_indices(&frame, 64);
//! let second = stream.dither_to_indices_parallel(&frame, 64);
//! assert_eq!(first.len(), second.len());
//! ```
//!
//! # Scan Rules
//!
//! - Rows run top to bottom. With serpentine scanning (the default) odd rows
//!   run right-to-left and the kernel is mirrored.
//! - Pending error is added to each channel, which is then clamped to
//!   `[0, 255]` before resolving.
//! - Each neighbor receives `floor(delta * weight / divisor)`.
//! - Error that would land outside the frame is dropped.
//!
//! # Nearest-Color Resolution
//!
//! [`Palette`] precomputes a 128³ table over the top seven bits of each
//! channel. Palette colors always resolve to themselves, and ties between
//! equally near entries go to the lowest index.

pub mod api;
pub mod color;
pub mod dither;
pub mod output;
pub mod palette;
pub mod temporal;

#[cfg(test)]
mod domain_tests;
#[cfg(test)]
mod test_support;

pub use api::{DitherError, Ditherer};
pub use color::Rgb;
pub use dither::{
    checked_height, fast_path_available, Backend, BayerSize, Dither, DitherAlgorithm,
    DitherOptions, ErrorDiffusionDither, Kernel, NearestDither, NoiseStrength, OrderedDither,
    RandomDither, UnknownAlgorithm, ATKINSON, BURKES, FILTER_LITE, FLOYD_STEINBERG,
    JARVIS_JUDICE_NINKE, KERNELS, STEVENSON_ARCE, STUCKI,
};
pub use output::DitheredFrame;
pub use palette::{
    DistanceMetric, Palette, PaletteError, ParseColorError, EIGHT_COLOR, MAX_COLORS,
};
pub use temporal::{FrameStats, TemporalDither, TemporalOptions};
