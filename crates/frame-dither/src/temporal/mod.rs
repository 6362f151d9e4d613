//! Temporally coherent error diffusion for video frames.
//!
//! [`TemporalDither`] wraps one error diffusion [`Kernel`] and remembers the
//! indices it produced for the previous frame. A pixel whose error-adjusted
//! color is still within `temporal_threshold` of its previous palette color
//! keeps that index, which removes flicker in static regions. Its residual
//! error is still diffused so that boundaries between static and moving
//! regions do not band.
//!
//! Frames can be split into horizontal strips that are dithered in
//! parallel. Each strip primes its error buffer from a few rows above its
//! start; output near strip boundaries is therefore close to, but not
//! always identical to, a sequential scan.
//!
//! One instance holds the state of one stream. Concurrent streams need one
//! instance each.

mod options;
mod strip;

use std::ops::{Add, AddAssign};
use std::sync::Arc;

use rayon::prelude::*;

pub use options::TemporalOptions;

use crate::api::DitherError;
use crate::dither::{frame_height, DitherOptions, Kernel};
use crate::palette::Palette;
use strip::TemporalScan;

/// Per-frame counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Pixels that kept their previous index.
    pub reused: usize,
    /// Pixels that were resolved afresh.
    pub quantized: usize,
    /// Pixels whose error was at or below `error_threshold` and not diffused.
    pub diffusion_skipped: usize,
}

impl FrameStats {
    /// Total pixels decided.
    pub fn pixels(&self) -> usize {
        self.reused + self.quantized
    }
}

impl Add for FrameStats {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for FrameStats {
    fn add_assign(&mut self, rhs: Self) {
        self.reused += rhs.reused;
        self.quantized += rhs.quantized;
        self.diffusion_skipped += rhs.diffusion_skipped;
    }
}

/// Error diffusion with previous-frame reuse.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use frame_dither::{Palette, TemporalDither, FLOYD_STEINBERG};
///
/// let palette = Arc::new(Palette::from_hex(&["#000", "#fff"]).unwrap());
/// let mut ditherer = TemporalDither::new(palette, FLOYD_STEINBERG);
///
/// let frame = vec![0xFF000000; 64];
/// ditherer.dither_to_indices(&frame, 8);
/// ditherer.dither_to_indices(&frame, 8);
/// assert_eq!(ditherer.last_stats().reused, 64);
/// ```
#[derive(Debug, Clone)]
pub struct TemporalDither {
    palette: Arc<Palette>,
    kernel: Kernel,
    dither_options: DitherOptions,
    options: TemporalOptions,
    previous: Option<Vec<u8>>,
    last_stats: FrameStats,
}

impl TemporalDither {
    pub fn new(palette: Arc<Palette>, kernel: Kernel) -> Self {
        Self {
            palette,
            kernel,
            dither_options: DitherOptions::default(),
            options: TemporalOptions::default(),
            previous: None,
            last_stats: FrameStats::default(),
        }
    }

    #[inline]
    pub fn with_options(mut self, options: TemporalOptions) -> Self {
        self.options = options;
        self
    }

    #[inline]
    pub fn with_dither_options(mut self, options: DitherOptions) -> Self {
        self.dither_options = options;
        self
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    #[inline]
    pub fn options(&self) -> &TemporalOptions {
        &self.options
    }

    /// Indices produced for the last frame, if any.
    pub fn previous_frame(&self) -> Option<&[u8]> {
        self.previous.as_deref()
    }

    /// Counters for the last frame dithered through this instance.
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Forget the previous frame; the next frame is dithered cold.
    ///
    /// Call on a source change, resolution change or stream restart.
    pub fn reset(&mut self) {
        if self.previous.take().is_some() {
            tracing::debug!("Temporal state reset");
        }
        self.last_stats = FrameStats::default();
    }

    /// Dither the next frame of the stream, reusing previous indices where
    /// the color has not moved.
    ///
    /// A previous frame of a different size is ignored.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or does not divide `pixels.len()`.
    pub fn dither_to_indices(&mut self, pixels: &[u32], width: usize) -> Vec<u8> {
        let height = frame_height(pixels.len(), width);
        let previous = self.take_previous(pixels.len());

        let mut out = vec![0u8; pixels.len()];
        let stats = self
            .scan(width, height)
            .strip(pixels, previous.as_deref(), 0, &mut out);

        self.finish(out, stats)
    }

    /// Like [`dither_to_indices`](Self::dither_to_indices), with the frame
    /// split into horizontal strips dithered in parallel.
    ///
    /// With a single strip the output is identical to the sequential path.
    pub fn dither_to_indices_parallel(&mut self, pixels: &[u32], width: usize) -> Vec<u8> {
        let height = frame_height(pixels.len(), width);
        let previous = self.take_previous(pixels.len());

        let strips = self
            .options
            .strips
            .unwrap_or_else(rayon::current_num_threads)
            .clamp(1, height.max(1));
        let rows_per_strip = height.div_ceil(strips).max(1);

        let mut out = vec![0u8; pixels.len()];
        let scan = self.scan(width, height);
        let prev = previous.as_deref();
        let stats = out
            .par_chunks_mut(rows_per_strip * width)
            .enumerate()
            .map(|(i, chunk)| scan.strip(pixels, prev, i * rows_per_strip, chunk))
            .reduce(FrameStats::default, |a, b| a + b);

        tracing::trace!(strips, rows_per_strip, "Dithered frame in strips");
        self.finish(out, stats)
    }

    /// Dither against an explicitly supplied previous frame without touching
    /// this instance's state.
    ///
    /// # Panics
    ///
    /// Panics if `previous.len() != pixels.len()`, or on a bad frame shape.
    pub fn dither_with_previous(
        &self,
        pixels: &[u32],
        width: usize,
        previous: &[u8],
    ) -> (Vec<u8>, FrameStats) {
        let height = frame_height(pixels.len(), width);
        if previous.len() != pixels.len() {
            panic!(
                "{}",
                DitherError::SnapshotLength {
                    expected: pixels.len(),
                    actual: previous.len(),
                }
            );
        }

        let mut out = vec![0u8; pixels.len()];
        let stats = self
            .scan(width, height)
            .strip(pixels, Some(previous), 0, &mut out);
        (out, stats)
    }

    /// Dither a buffer in place with this instance's thresholds and strength
    /// but no previous frame. Temporal state is neither read nor updated.
    pub fn dither_in_place(&self, buffer: &mut [u32], width: usize) {
        let height = frame_height(buffer.len(), width);
        let mut indices = vec![0u8; buffer.len()];
        self.scan(width, height).strip(buffer, None, 0, &mut indices);
        for (pixel, &index) in buffer.iter_mut().zip(&indices) {
            *pixel = self.palette.packed(index as usize);
        }
    }

    fn scan(&self, width: usize, height: usize) -> TemporalScan<'_> {
        TemporalScan {
            palette: &self.palette,
            kernel: &self.kernel,
            options: &self.dither_options,
            temporal_threshold: self.options.temporal_threshold,
            error_threshold: self.options.error_threshold,
            strength_256: self.options.strength_256(),
            warmup_rows: self.options.warmup_rows,
            width,
            height,
        }
    }

    fn take_previous(&mut self, len: usize) -> Option<Vec<u8>> {
        match self.previous.take() {
            Some(prev) if prev.len() == len => Some(prev),
            Some(prev) => {
                tracing::debug!(
                    previous = prev.len(),
                    current = len,
                    "Frame size changed, dithering cold"
                );
                None
            }
            None => None,
        }
    }

    fn finish(&mut self, out: Vec<u8>, stats: FrameStats) -> Vec<u8> {
        tracing::debug!(
            pixels = out.len(),
            reused = stats.reused,
            quantized = stats.quantized,
            skipped = stats.diffusion_skipped,
            "Dithered frame"
        );
        self.last_stats = stats;
        self.previous = Some(out.clone());
        out
    }
}
