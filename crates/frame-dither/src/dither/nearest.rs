//! Plain nearest-color mapping.

use std::sync::Arc;

use super::{frame_height, Dither, Frame, InPlace, ToIndices};
use crate::palette::Palette;

/// Maps every pixel to its nearest palette color without spreading error.
///
/// Useful as a baseline, and for content that is already drawn in palette
/// colors.
#[derive(Debug, Clone)]
pub struct NearestDither {
    palette: Arc<Palette>,
}

impl NearestDither {
    pub fn new(palette: Arc<Palette>) -> Self {
        Self { palette }
    }

    fn scan<F: Frame>(&self, frame: &mut F, len: usize) {
        for idx in 0..len {
            let index = self.palette.nearest_index_packed(frame.pixel(idx));
            frame.emit(idx, index, &self.palette);
        }
    }
}

impl Dither for NearestDither {
    fn palette(&self) -> &Palette {
        &self.palette
    }

    fn dither_in_place(&self, buffer: &mut [u32], width: usize) {
        frame_height(buffer.len(), width);
        let len = buffer.len();
        self.scan(&mut InPlace(buffer), len);
    }

    fn dither_to_indices(&self, buffer: &[u32], width: usize) -> Vec<u8> {
        frame_height(buffer.len(), width);
        let mut out = vec![0u8; buffer.len()];
        self.scan(
            &mut ToIndices {
                pixels: buffer,
                out: &mut out,
            },
            buffer.len(),
        );
        out
    }
}
