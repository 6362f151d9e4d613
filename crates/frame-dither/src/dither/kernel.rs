//! Error diffusion kernel definitions.
//!
//! Each kernel specifies how quantization error is distributed to
//! not-yet-visited neighbors. Offsets are given for a left-to-right scan;
//! the driver mirrors `dx` on right-to-left rows.

/// An error diffusion kernel.
///
/// Each neighbor receives `floor(delta * weight / divisor)` per channel, which
/// matches an arithmetic right shift for power-of-two divisors.
///
/// # Buffer Sizing
///
/// The `max_dy` field indicates how many rows ahead the kernel reaches,
/// which determines the error buffer depth needed: `max_dy + 1` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kernel {
    /// Display name.
    pub name: &'static str,

    /// (dx, dy, weight) entries for error diffusion.
    ///
    /// - `dx`: horizontal offset (positive = right, flipped for serpentine)
    /// - `dy`: vertical offset (never negative)
    /// - `weight`: numerator over `divisor`
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,

    /// Maximum dy value in entries.
    pub max_dy: usize,
}

impl Kernel {
    /// Share of `delta` that goes to a neighbor of the given weight.
    #[inline]
    pub fn share(&self, delta: i32, weight: u8) -> i32 {
        (delta * weight as i32).div_euclid(self.divisor as i32)
    }

    /// Sum of all weights; equal to `divisor` for kernels that propagate
    /// the full error.
    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|&(_, _, w)| w as u32).sum()
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    name: "Floyd-Steinberg",
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};

/// Atkinson dithering kernel.
///
/// Propagates 6/8 of the error. The lost quarter keeps small palettes from
/// bleeding.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
pub const ATKINSON: Kernel = Kernel {
    name: "Atkinson",
    entries: &[
        (1, 0, 1),
        (2, 0, 1),
        (-1, 1, 1),
        (0, 1, 1),
        (1, 1, 1),
        (0, 2, 1),
    ],
    divisor: 8,
    max_dy: 2,
};

/// Burkes dithering kernel.
///
/// ```text
///            X   8   4
///    2   4   8   4   2
/// ```
pub const BURKES: Kernel = Kernel {
    name: "Burkes",
    entries: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
    ],
    divisor: 32,
    max_dy: 1,
};

/// Stucki dithering kernel.
///
/// ```text
///            X   8   4
///    2   4   8   4   2
///    1   2   4   2   1
/// ```
pub const STUCKI: Kernel = Kernel {
    name: "Stucki",
    entries: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
        (-2, 2, 1),
        (-1, 2, 2),
        (0, 2, 4),
        (1, 2, 2),
        (2, 2, 1),
    ],
    divisor: 42,
    max_dy: 2,
};

/// Jarvis-Judice-Ninke dithering kernel.
///
/// ```text
///            X   7   5
///    3   5   7   5   3
///    1   3   5   3   1
/// ```
pub const JARVIS_JUDICE_NINKE: Kernel = Kernel {
    name: "Jarvis-Judice-Ninke",
    entries: &[
        (1, 0, 7),
        (2, 0, 5),
        (-2, 1, 3),
        (-1, 1, 5),
        (0, 1, 7),
        (1, 1, 5),
        (2, 1, 3),
        (-2, 2, 1),
        (-1, 2, 3),
        (0, 2, 5),
        (1, 2, 3),
        (2, 2, 1),
    ],
    divisor: 48,
    max_dy: 2,
};

/// Stevenson-Arce dithering kernel.
///
/// Designed for hexagonal grids; taps skip every other column and reach
/// three rows down.
///
/// ```text
///                X      32
///    12      26      30      16
///        12      26      12
///     5      12      12       5
/// ```
pub const STEVENSON_ARCE: Kernel = Kernel {
    name: "Stevenson-Arce",
    entries: &[
        (2, 0, 32),
        (-3, 1, 12),
        (-1, 1, 26),
        (1, 1, 30),
        (3, 1, 16),
        (-2, 2, 12),
        (0, 2, 26),
        (2, 2, 12),
        (-3, 3, 5),
        (-1, 3, 12),
        (1, 3, 12),
        (3, 3, 5),
    ],
    divisor: 200,
    max_dy: 3,
};

/// Filter Lite (Sierra Lite) dithering kernel.
///
/// ```text
///    X   2
///    1   1
/// ```
pub const FILTER_LITE: Kernel = Kernel {
    name: "Filter Lite",
    entries: &[(1, 0, 2), (-1, 1, 1), (0, 1, 1)],
    divisor: 4,
    max_dy: 1,
};

/// Every diffusion kernel, in [`DitherAlgorithm`](super::DitherAlgorithm) order.
pub const KERNELS: [Kernel; 7] = [
    FLOYD_STEINBERG,
    ATKINSON,
    BURKES,
    STUCKI,
    JARVIS_JUDICE_NINKE,
    STEVENSON_ARCE,
    FILTER_LITE,
];
