//! Palette struct with constant-time nearest-color matching.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use super::error::PaletteError;
use super::lut::{self, NearestTable, AMBIGUOUS};
use crate::color::Rgb;

/// Largest palette a `u8` index can address.
pub const MAX_COLORS: usize = 256;

/// Distance metric for palette color matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DistanceMetric {
    /// Unweighted squared Euclidean distance over R, G and B.
    #[default]
    Euclidean,

    /// "Redmean" weighted RGB distance.
    ///
    /// Red and blue weights shift with the mean red level of the two colors
    /// being compared, green is weighted highest:
    ///
    /// `(2 + r̄/256)·ΔR² + 4·ΔG² + (2 + (255 - r̄)/256)·ΔB²`
    Redmean,
}

impl DistanceMetric {
    /// Distance between a (possibly fractional) point and a palette color.
    #[inline]
    pub(crate) fn distance(self, point: [f64; 3], color: Rgb) -> f64 {
        let dr = point[0] - color.r as f64;
        let dg = point[1] - color.g as f64;
        let db = point[2] - color.b as f64;
        match self {
            DistanceMetric::Euclidean => dr * dr + dg * dg + db * db,
            DistanceMetric::Redmean => {
                let mean_r = (point[0] + color.r as f64) / 2.0;
                (2.0 + mean_r / 256.0) * dr * dr
                    + 4.0 * dg * dg
                    + (2.0 + (255.0 - mean_r) / 256.0) * db * db
            }
        }
    }
}

/// An immutable table of at most 256 colors.
///
/// Construction precomputes a 128³ lookup table so that
/// [`nearest_index`](Self::nearest_index) costs one memory read for almost
/// every input. The palette is cheap to clone and is meant to be shared
/// through an [`Arc`] by every ditherer that uses it.
///
/// # Resolution rules
///
/// - A color that is itself a palette entry always resolves to that entry.
/// - When two entries are equally near, the lower index wins.
/// - The table is a cache only: [`nearest_index`](Self::nearest_index)
///   always equals [`nearest_index_exact`](Self::nearest_index_exact).
///
/// # Example
///
/// ```
/// use frame_dither::{Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
/// assert_eq!(palette.nearest_index(40, 40, 40), 0);
/// assert_eq!(palette.nearest_index(200, 210, 220), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<Rgb>,
    packed: Vec<u32>,
    metric: DistanceMetric,
    table: Arc<NearestTable>,
}

impl Palette {
    /// Create a palette matched with [`DistanceMetric::Euclidean`].
    ///
    /// # Errors
    ///
    /// - [`PaletteError::Empty`] if `colors` is empty
    /// - [`PaletteError::TooManyColors`] beyond [`MAX_COLORS`] entries
    /// - [`PaletteError::DuplicateColor`] if a color appears twice
    pub fn new(colors: &[Rgb]) -> Result<Self, PaletteError> {
        Self::with_distance_metric(colors, DistanceMetric::default())
    }

    /// Create a palette matched with the given metric.
    pub fn with_distance_metric(
        colors: &[Rgb],
        metric: DistanceMetric,
    ) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        if colors.len() > MAX_COLORS {
            return Err(PaletteError::TooManyColors { len: colors.len() });
        }

        let mut seen = HashSet::with_capacity(colors.len());
        for (i, color) in colors.iter().enumerate() {
            if !seen.insert(*color) {
                return Err(PaletteError::DuplicateColor { index: i });
            }
        }

        Ok(Self::build(colors, metric))
    }

    fn build(colors: &[Rgb], metric: DistanceMetric) -> Self {
        let table = NearestTable::build(colors, metric);
        tracing::debug!(
            colors = colors.len(),
            ?metric,
            ambiguous = table.ambiguous_buckets(),
            "Built nearest-color table"
        );

        Self {
            colors: colors.to_vec(),
            packed: colors.iter().map(|c| c.to_packed()).collect(),
            metric,
            table: Arc::new(table),
        }
    }

    /// Create a palette from hex color strings such as `"#FF0000"` or `"#F00"`.
    ///
    /// ```
    /// use frame_dither::Palette;
    ///
    /// let palette = Palette::from_hex(&["#000", "#FFF", "#FF0000"]).unwrap();
    /// assert_eq!(palette.len(), 3);
    /// ```
    pub fn from_hex(colors: &[&str]) -> Result<Self, PaletteError> {
        let colors = colors
            .iter()
            .map(|s| Rgb::from_str(s))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&colors)
    }

    /// Create a palette from a JSON table of `[r, g, b]` triples.
    ///
    /// ```
    /// use frame_dither::Palette;
    ///
    /// let palette = Palette::from_json("[[0, 0, 0], [255, 255, 255]]").unwrap();
    /// assert_eq!(palette.len(), 2);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, PaletteError> {
        Self::new(&Self::colors_from_json(json)?)
    }

    /// Parse a JSON table of `[r, g, b]` triples without building a palette.
    ///
    /// Useful when the colors are to be combined with a non-default
    /// [`DistanceMetric`].
    pub fn colors_from_json(json: &str) -> Result<Vec<Rgb>, PaletteError> {
        let entries: Vec<Vec<u8>> = serde_json::from_str(json)?;
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| match entry.as_slice() {
                &[r, g, b] => Ok(Rgb::new(r, g, b)),
                _ => Err(PaletteError::InvalidEntry { index }),
            })
            .collect()
    }

    /// Built-in eight color palette: red, green, blue, white, black, yellow,
    /// cyan and purple, tuned to the gamut of low-cost color panels.
    pub fn eight_color() -> Self {
        Self::build(&EIGHT_COLOR, DistanceMetric::default())
    }

    /// Number of colors.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`: construction rejects empty palettes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All colors in index order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Color at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn color(&self, index: usize) -> Rgb {
        self.colors[index]
    }

    /// Opaque packed pixel for the color at `index`.
    #[inline]
    pub fn packed(&self, index: usize) -> u32 {
        self.packed[index]
    }

    /// Metric used to build the lookup table.
    #[inline]
    pub fn distance_metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Index of the nearest palette color.
    #[inline]
    pub fn nearest_index(&self, r: u8, g: u8, b: u8) -> u8 {
        match self.table.get(r, g, b) {
            AMBIGUOUS => self.nearest_index_exact(r, g, b),
            index => index as u8,
        }
    }

    /// Nearest palette color, packed as `0xFFRRGGBB`.
    #[inline]
    pub fn nearest_color(&self, r: u8, g: u8, b: u8) -> u32 {
        self.packed[self.nearest_index(r, g, b) as usize]
    }

    /// Index of the nearest palette color for a packed pixel; alpha is ignored.
    #[inline]
    pub fn nearest_index_packed(&self, pixel: u32) -> u8 {
        let c = Rgb::from_packed(pixel);
        self.nearest_index(c.r, c.g, c.b)
    }

    /// Like [`nearest_index_packed`](Self::nearest_index_packed), but a fully
    /// transparent pixel (alpha `0`) maps to index 0.
    ///
    /// For palettes whose first entry stands in for transparency.
    #[inline]
    pub fn nearest_index_with_alpha(&self, pixel: u32) -> u8 {
        if pixel >> 24 == 0 {
            return 0;
        }
        self.nearest_index_packed(pixel)
    }

    /// Nearest palette index by a full scan at the exact input color.
    pub fn nearest_index_exact(&self, r: u8, g: u8, b: u8) -> u8 {
        lut::nearest_scan(&self.colors, self.metric, [r as f64, g as f64, b as f64]) as u8
    }

    /// Nearest index for an error-adjusted color already clamped to `[0, 255]`.
    #[inline]
    pub(crate) fn resolve(&self, adjusted: [i32; 3]) -> u8 {
        self.nearest_index(adjusted[0] as u8, adjusted[1] as u8, adjusted[2] as u8)
    }
}

/// Colors of [`Palette::eight_color`], in index order.
pub const EIGHT_COLOR: [Rgb; 8] = [
    Rgb::new(255, 0, 0),
    Rgb::new(0, 217, 58),
    Rgb::new(55, 55, 220),
    Rgb::new(255, 255, 255),
    Rgb::new(0, 0, 0),
    Rgb::new(229, 229, 51),
    Rgb::new(92, 219, 213),
    Rgb::new(178, 76, 216),
];
