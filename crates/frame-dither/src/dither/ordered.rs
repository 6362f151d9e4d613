//! Ordered (Bayer matrix) dithering.
//!
//! A per-position threshold offset is added to each channel before nearest
//! color resolution. The offset range is one palette step, where the step
//! is estimated from the number of distinct levels per channel.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::{frame_height, Dither, Frame, InPlace, NoiseStrength, ToIndices};
use crate::color::Rgb;
use crate::palette::Palette;

/// Side length of the threshold matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BayerSize {
    /// 2×2, 4 thresholds.
    Two,
    /// 4×4, 16 thresholds.
    Four,
    /// 8×8, 64 thresholds.
    Eight,
}

impl BayerSize {
    pub fn side(self) -> usize {
        match self {
            BayerSize::Two => 2,
            BayerSize::Four => 4,
            BayerSize::Eight => 8,
        }
    }

    /// Row-major Bayer matrix holding each of `0..side²` once.
    ///
    /// Built by the usual recursion `M(2n) = [[4M, 4M+2], [4M+3, 4M+1]]`.
    pub fn matrix(self) -> Vec<u32> {
        let mut m = vec![0u32];
        let mut n = 1;
        while n < self.side() {
            let w = n * 2;
            let mut next = vec![0u32; w * w];
            for y in 0..n {
                for x in 0..n {
                    let v = 4 * m[y * n + x];
                    next[y * w + x] = v;
                    next[y * w + x + n] = v + 2;
                    next[(y + n) * w + x] = v + 3;
                    next[(y + n) * w + x + n] = v + 1;
                }
            }
            m = next;
            n = w;
        }
        m
    }
}

impl NoiseStrength {
    fn ordered_factor(self) -> f64 {
        match self {
            NoiseStrength::Light => 0.5,
            NoiseStrength::Normal => 1.0,
            NoiseStrength::Heavy => 2.0,
        }
    }
}

/// Bayer ordered ditherer.
#[derive(Debug, Clone)]
pub struct OrderedDither {
    palette: Arc<Palette>,
    size: BayerSize,
    strength: NoiseStrength,
    offsets: Vec<i32>,
}

impl OrderedDither {
    pub fn new(palette: Arc<Palette>, size: BayerSize) -> Self {
        let mut ditherer = Self {
            palette,
            size,
            strength: NoiseStrength::default(),
            offsets: Vec::new(),
        };
        ditherer.offsets = ditherer.compute_offsets();
        ditherer
    }

    /// Scale the threshold offsets.
    pub fn with_strength(mut self, strength: NoiseStrength) -> Self {
        self.strength = strength;
        self.offsets = self.compute_offsets();
        self
    }

    pub fn size(&self) -> BayerSize {
        self.size
    }

    /// Channel offset for each matrix cell, row-major.
    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    fn compute_offsets(&self) -> Vec<i32> {
        let cells = (self.size.side() * self.size.side()) as f64;
        let step = 255.0 / (channel_levels(&self.palette) - 1.0);
        let scale = self.strength.ordered_factor() * step;
        self.size
            .matrix()
            .into_iter()
            .map(|m| (((m as f64 + 0.5) / cells - 0.5) * scale).round() as i32)
            .collect()
    }

    fn scan<F: Frame>(&self, frame: &mut F, width: usize, height: usize) {
        let n = self.size.side();
        for y in 0..height {
            let row = &self.offsets[(y % n) * n..(y % n + 1) * n];
            for x in 0..width {
                let idx = y * width + x;
                let offset = row[x % n];
                let c = Rgb::from_packed(frame.pixel(idx)).to_i32();
                let adjusted = [
                    (c[0] + offset).clamp(0, 255),
                    (c[1] + offset).clamp(0, 255),
                    (c[2] + offset).clamp(0, 255),
                ];
                frame.emit(idx, self.palette.resolve(adjusted), &self.palette);
            }
        }
    }
}

/// Average number of distinct values per channel, at least 2.
fn channel_levels(palette: &Palette) -> f64 {
    let count = |channel: fn(&Rgb) -> u8| {
        palette
            .colors()
            .iter()
            .map(channel)
            .collect::<BTreeSet<_>>()
            .len()
    };
    let total = count(|c| c.r) + count(|c| c.g) + count(|c| c.b);
    (total as f64 / 3.0).max(2.0)
}

impl Dither for OrderedDither {
    fn palette(&self) -> &Palette {
        &self.palette
    }

    fn dither_in_place(&self, buffer: &mut [u32], width: usize) {
        let height = frame_height(buffer.len(), width);
        self.scan(&mut InPlace(buffer), width, height);
    }

    fn dither_to_indices(&self, buffer: &[u32], width: usize) -> Vec<u8> {
        let height = frame_height(buffer.len(), width);
        let mut out = vec![0u8; buffer.len()];
        self.scan(
            &mut ToIndices {
                pixels: buffer,
                out: &mut out,
            },
            width,
            height,
        );
        out
    }
}
