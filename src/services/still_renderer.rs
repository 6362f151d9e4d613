use std::sync::Arc;

use frame_dither::{Ditherer, Palette};

use crate::error::AppError;
use crate::models::AppConfig;
use crate::rendering::{encode_indexed, encode_rgb, DecodedImage};

/// Dithers single images with the configured algorithm.
pub struct StillRenderer {
    ditherer: Ditherer,
}

impl StillRenderer {
    pub fn new(config: &AppConfig, palette: Arc<Palette>) -> Self {
        let ditherer = Ditherer::new(palette)
            .algorithm(config.algorithm)
            .options(config.dither_options())
            .strength(config.strength);
        Self { ditherer }
    }

    pub fn ditherer(&self) -> &Ditherer {
        &self.ditherer
    }

    /// Dither `image` and encode the result as an indexed PNG.
    pub fn render_indexed(&self, image: &DecodedImage) -> Result<Vec<u8>, AppError> {
        let frame = self.ditherer.dither_frame(&image.pixels, image.width)?;
        tracing::info!(
            width = frame.width(),
            height = frame.height(),
            algorithm = %self.ditherer.selected_algorithm(),
            colors = frame.palette().len(),
            "Dithered image"
        );
        encode_indexed(&frame)
    }

    /// Dither `image` in place and encode the palette colors as an RGB PNG.
    pub fn render_preview(&self, image: &DecodedImage) -> Result<Vec<u8>, AppError> {
        let mut pixels = image.pixels.clone();
        self.ditherer.try_dither_in_place(&mut pixels, image.width)?;
        tracing::info!(
            width = image.width,
            height = image.height,
            algorithm = %self.ditherer.selected_algorithm(),
            "Rendered preview"
        );
        encode_rgb(&pixels, image.width, image.height)
    }
}
