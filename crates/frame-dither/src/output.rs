//! Dithered frame output.

use std::sync::Arc;

use crate::palette::Palette;

/// Palette indices for one frame plus the palette they index into.
///
/// The indexed form is canonical; RGB forms are computed on demand.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use frame_dither::{DitheredFrame, Palette};
///
/// let palette = Arc::new(Palette::from_hex(&["#000", "#fff"]).unwrap());
/// let frame = DitheredFrame::new(vec![0, 1, 1, 0], 2, 2, palette);
///
/// assert_eq!(frame.to_rgb_bytes(), vec![0, 0, 0, 255, 255, 255, 255, 255, 255, 0, 0, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct DitheredFrame {
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: Arc<Palette>,
}

impl DitheredFrame {
    /// Wrap indices produced for a `width` × `height` frame.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height`.
    pub fn new(indices: Vec<u8>, width: usize, height: usize, palette: Arc<Palette>) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match width * height ({}x{})",
            indices.len(),
            width,
            height,
        );
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    #[inline]
    pub fn into_indices(self) -> Vec<u8> {
        self.indices
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Opaque packed pixels.
    pub fn to_packed(&self) -> Vec<u32> {
        self.indices
            .iter()
            .map(|&i| self.palette.packed(i as usize))
            .collect()
    }

    /// `[R, G, B, R, G, B, ...]` bytes, `width * height * 3` long.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.indices.len() * 3);
        for &i in &self.indices {
            rgb.extend_from_slice(&self.palette.color(i as usize).to_array());
        }
        rgb
    }
}
