//! Capability-checked fast path for the Filter Lite kernel.
//!
//! The specialized routine unrolls the three taps into shifts over two flat
//! error rows. It must produce exactly what the table driven driver
//! produces; only speed may differ.

use std::sync::OnceLock;

use super::kernel::{Kernel, FILTER_LITE};
use super::{delta, DitherOptions, Frame};
use crate::color::adjust;
use crate::palette::Palette;

/// Setting this environment variable (to anything) disables the fast path.
pub const PORTABLE_ENV: &str = "FRAME_DITHER_PORTABLE";

/// Whether the fast path may be used on this host. Resolved once per process.
pub fn fast_path_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| {
        let supported = cfg!(any(target_arch = "x86_64", target_arch = "aarch64"));
        let disabled = std::env::var_os(PORTABLE_ENV).is_some();
        tracing::debug!(supported, disabled, "Resolved dithering fast path");
        supported && !disabled
    })
}

/// Implementation strategy for an error diffusion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Table driven driver, works for every kernel.
    Portable,
    /// Specialized routine; only used for kernels that have one.
    FastPath,
}

impl Backend {
    /// Fastest backend available for `kernel` on this host.
    pub fn select(kernel: &Kernel) -> Self {
        if supports(kernel) && fast_path_available() {
            Backend::FastPath
        } else {
            Backend::Portable
        }
    }
}

/// Whether a specialized routine exists for `kernel`.
pub(crate) fn supports(kernel: &Kernel) -> bool {
    *kernel == FILTER_LITE
}

#[inline]
fn add(cell: &mut [i32; 3], amount: [i32; 3]) {
    cell[0] += amount[0];
    cell[1] += amount[1];
    cell[2] += amount[2];
}

/// Filter Lite with the taps unrolled: 1/2 ahead, 1/4 below-behind, 1/4 below.
pub(crate) fn filter_lite<F: Frame>(
    frame: &mut F,
    width: usize,
    height: usize,
    palette: &Palette,
    options: &DitherOptions,
) {
    let mut current = vec![[0i32; 3]; width];
    let mut next = vec![[0i32; 3]; width];

    for y in 0..height {
        let reverse = options.reversed(y);
        let has_next = y + 1 < height;

        for step in 0..width {
            let x = if reverse { width - 1 - step } else { step };
            let idx = y * width + x;

            let adjusted = adjust(frame.pixel(idx), current[x]);
            let index = palette.resolve(adjusted);
            frame.emit(idx, index, palette);

            let d = delta(adjusted, palette.color(index as usize).to_i32());
            if d == [0; 3] {
                continue;
            }
            let half = [d[0] >> 1, d[1] >> 1, d[2] >> 1];
            let quarter = [d[0] >> 2, d[1] >> 2, d[2] >> 2];

            let (ahead, behind) = if reverse {
                (x.checked_sub(1), Some(x + 1))
            } else {
                (Some(x + 1), x.checked_sub(1))
            };
            if let Some(ax) = ahead.filter(|&ax| ax < width) {
                add(&mut current[ax], half);
            }
            if has_next {
                if let Some(bx) = behind.filter(|&bx| bx < width) {
                    add(&mut next[bx], quarter);
                }
                add(&mut next[x], quarter);
            }
        }

        std::mem::swap(&mut current, &mut next);
        next.fill([0; 3]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dither::{diffuse_frame, ToIndices, FLOYD_STEINBERG};
    use crate::test_support::{black_white, eight, gradient};

    fn run_both(pixels: &[u32], width: usize, palette: &Palette, options: &DitherOptions) {
        let height = pixels.len() / width;
        let mut portable = vec![0u8; pixels.len()];
        let mut fast = vec![0u8; pixels.len()];
        diffuse_frame(
            &mut ToIndices {
                pixels,
                out: &mut portable,
            },
            width,
            height,
            palette,
            &FILTER_LITE,
            options,
        );
        filter_lite(
            &mut ToIndices {
                pixels,
                out: &mut fast,
            },
            width,
            height,
            palette,
            options,
        );
        assert_eq!(portable, fast, "{width}x{height}");
    }

    #[test]
    fn test_matches_portable_driver() {
        for &(w, h) in &[(1, 1), (1, 7), (7, 1), (16, 9), (33, 20)] {
            let pixels = gradient(w, h);
            run_both(&pixels, w, &eight(), &DitherOptions::new());
            run_both(&pixels, w, &black_white(), &DitherOptions::new());
            run_both(&pixels, w, &eight(), &DitherOptions::new().serpentine(false));
        }
    }

    #[test]
    fn test_only_filter_lite_is_supported() {
        assert!(supports(&FILTER_LITE));
        assert!(!supports(&FLOYD_STEINBERG));
        assert_eq!(Backend::select(&FLOYD_STEINBERG), Backend::Portable);
    }
}
