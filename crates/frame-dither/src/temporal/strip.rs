//! Row and strip scanning for temporal dithering.

use super::FrameStats;
use crate::color::adjust;
use crate::dither::{delta, DitherOptions, ErrorBuffer, Kernel};
use crate::palette::Palette;

/// Read-only state for one frame, shared by every strip.
#[derive(Debug, Clone, Copy)]
pub(super) struct TemporalScan<'a> {
    pub palette: &'a Palette,
    pub kernel: &'a Kernel,
    pub options: &'a DitherOptions,
    pub temporal_threshold: u32,
    pub error_threshold: u32,
    pub strength_256: i32,
    pub warmup_rows: usize,
    pub width: usize,
    pub height: usize,
}

impl TemporalScan<'_> {
    /// Dither the rows starting at `start_row` into `out` (a whole number of
    /// rows).
    ///
    /// A strip that does not start at the top first re-scans up to
    /// `warmup_rows` rows above it, discarding their output, so its error
    /// buffer starts close to what a full sequential scan would carry.
    pub(super) fn strip(
        &self,
        pixels: &[u32],
        previous: Option<&[u8]>,
        start_row: usize,
        out: &mut [u8],
    ) -> FrameStats {
        let mut errors = ErrorBuffer::new(self.width, self.kernel.max_dy + 1);

        if start_row > 0 {
            let mut scratch = vec![0u8; self.width];
            let mut ignored = FrameStats::default();
            for y in start_row.saturating_sub(self.warmup_rows)..start_row {
                self.row(pixels, previous, y, &mut errors, &mut scratch, &mut ignored);
                errors.advance_row();
            }
        }

        let mut stats = FrameStats::default();
        for (i, out_row) in out.chunks_exact_mut(self.width).enumerate() {
            self.row(pixels, previous, start_row + i, &mut errors, out_row, &mut stats);
            errors.advance_row();
        }
        stats
    }

    fn row(
        &self,
        pixels: &[u32],
        previous: Option<&[u8]>,
        y: usize,
        errors: &mut ErrorBuffer,
        out_row: &mut [u8],
        stats: &mut FrameStats,
    ) {
        let reverse = self.options.reversed(y);
        let rows_below = self.height - y - 1;
        let base = y * self.width;

        for step in 0..self.width {
            let x = if reverse { self.width - 1 - step } else { step };
            let adjusted = adjust(pixels[base + x], errors.accumulated(x));

            let kept = previous
                .map(|prev| prev[base + x])
                .filter(|&prev| self.reusable(adjusted, prev));

            let (index, strength) = match kept {
                Some(prev) => {
                    stats.reused += 1;
                    // Residual error of a kept pixel is spread unscaled.
                    (prev, 256)
                }
                None => {
                    stats.quantized += 1;
                    (self.palette.resolve(adjusted), self.strength_256)
                }
            };
            out_row[x] = index;

            let d = delta(adjusted, self.palette.color(index as usize).to_i32());
            let magnitude = d[0].unsigned_abs() + d[1].unsigned_abs() + d[2].unsigned_abs();
            if magnitude <= self.error_threshold {
                stats.diffusion_skipped += 1;
                continue;
            }
            let scaled = [
                (d[0] * strength) >> 8,
                (d[1] * strength) >> 8,
                (d[2] * strength) >> 8,
            ];
            errors.diffuse(self.kernel, x, reverse, rows_below, scaled);
        }
    }

    /// Whether `adjusted` is within the temporal threshold of palette entry `prev`.
    #[inline]
    fn reusable(&self, adjusted: [i32; 3], prev: u8) -> bool {
        if prev as usize >= self.palette.len() {
            return false;
        }
        let color = self.palette.color(prev as usize).to_i32();
        (0..3).all(|c| adjusted[c].abs_diff(color[c]) <= self.temporal_threshold)
    }
}
