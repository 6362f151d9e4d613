//! Dense nearest-color lookup table over a 7-bit color cube.
//!
//! Each channel is reduced to its top 7 bits, giving 128³ buckets of 2×2×2
//! input colors. A bucket whose eight colors all share one nearest palette
//! entry stores that index; any other bucket holds [`AMBIGUOUS`] and is
//! resolved by an exact scan at query time. A table lookup therefore always
//! agrees with the exact scan, ties included.

use std::fmt;

use rayon::prelude::*;

use super::palette::DistanceMetric;
use crate::color::Rgb;

/// Marker for buckets that need an exact scan.
pub(crate) const AMBIGUOUS: u16 = u16::MAX;

const SIDE: usize = 128;
const PLANE: usize = SIDE * SIDE;

/// Number of buckets in the table.
pub(crate) const LEN: usize = SIDE * PLANE;

/// Bucket index for an 8-bit color.
#[inline]
pub(crate) fn bucket(r: u8, g: u8, b: u8) -> usize {
    ((r as usize >> 1) << 14) | ((g as usize >> 1) << 7) | (b as usize >> 1)
}

/// Nearest entry shared by all eight colors of bucket `(rk, gk, bk)`, or
/// [`AMBIGUOUS`] if they disagree.
fn resolve_bucket(
    colors: &[Rgb],
    metric: DistanceMetric,
    rk: usize,
    gk: usize,
    bk: usize,
) -> u16 {
    let mut agreed = None;
    for corner in 0..8 {
        let point = [
            (2 * rk + (corner >> 2 & 1)) as f64,
            (2 * gk + (corner >> 1 & 1)) as f64,
            (2 * bk + (corner & 1)) as f64,
        ];
        let index = nearest_scan(colors, metric, point) as u16;
        match agreed {
            None => agreed = Some(index),
            Some(first) if first != index => return AMBIGUOUS,
            Some(_) => {}
        }
    }
    agreed.unwrap_or(AMBIGUOUS)
}

pub(crate) struct NearestTable {
    entries: Vec<u16>,
}

impl NearestTable {
    /// Build the table for `colors` under `metric`.
    ///
    /// Red planes are computed in parallel; ties go to the lowest index.
    pub(crate) fn build(colors: &[Rgb], metric: DistanceMetric) -> Self {
        let mut entries = vec![0u16; LEN];

        entries
            .par_chunks_mut(PLANE)
            .enumerate()
            .for_each(|(rk, plane)| {
                for gk in 0..SIDE {
                    for bk in 0..SIDE {
                        plane[(gk << 7) | bk] = resolve_bucket(colors, metric, rk, gk, bk);
                    }
                }
            });

        Self { entries }
    }

    /// Raw table entry for a color: a palette index or [`AMBIGUOUS`].
    #[inline]
    pub(crate) fn get(&self, r: u8, g: u8, b: u8) -> u16 {
        self.entries[bucket(r, g, b)]
    }

    /// Number of buckets that fall back to an exact scan.
    pub(crate) fn ambiguous_buckets(&self) -> usize {
        self.entries.iter().filter(|&&e| e == AMBIGUOUS).count()
    }
}

impl fmt::Debug for NearestTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearestTable")
            .field("buckets", &self.entries.len())
            .finish_non_exhaustive()
    }
}

/// Linear scan for the nearest color. Strict `<` keeps the lowest index on ties.
pub(crate) fn nearest_scan(colors: &[Rgb], metric: DistanceMetric, point: [f64; 3]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &color) in colors.iter().enumerate() {
        let dist = metric.distance(point, color);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}
