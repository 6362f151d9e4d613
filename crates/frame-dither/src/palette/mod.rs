//! Palette types and nearest-color resolution
//!
//! A [`Palette`] is an immutable table of at most 256 colors together with a
//! precomputed lookup table that resolves any RGB triple to the index of the
//! closest entry in constant time.

mod error;
mod lut;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use palette::{DistanceMetric, Palette, EIGHT_COLOR, MAX_COLORS};
