use std::sync::Arc;

use frame_dither::{checked_height, DitheredFrame, Ditherer, FrameStats, Palette, TemporalDither};

use crate::error::AppError;
use crate::models::AppConfig;
use crate::rendering::DecodedImage;

/// Feeds one stream of frames through a temporal ditherer.
///
/// The pipeline owns the temporal state of the stream: consecutive frames
/// of the same size share the previous index snapshot, and a size change
/// starts the stream over.
pub struct FramePipeline {
    ditherer: TemporalDither,
    palette: Arc<Palette>,
    parallel: bool,
    size: Option<(usize, usize)>,
    frames: u64,
}

impl FramePipeline {
    /// Build a pipeline for the configured kernel and temporal settings.
    ///
    /// Fails if the configured algorithm does not diffuse error.
    pub fn new(config: &AppConfig, palette: Arc<Palette>) -> Result<Self, AppError> {
        let ditherer = Ditherer::new(palette.clone())
            .algorithm(config.algorithm)
            .options(config.dither_options())
            .temporal(config.temporal.clone())?;

        Ok(Self {
            ditherer,
            palette,
            parallel: config.parallel,
            size: None,
            frames: 0,
        })
    }

    /// Dither the next frame of the stream.
    pub fn process(&mut self, image: &DecodedImage) -> Result<DitheredFrame, AppError> {
        let height = checked_height(image.pixels.len(), image.width)?;
        let size = (image.width, height);
        if self.size.is_some_and(|previous| previous != size) {
            tracing::info!(
                width = image.width,
                height,
                frame = self.frames,
                "Frame size changed, restarting stream"
            );
            self.ditherer.reset();
        }
        self.size = Some(size);

        let indices = if self.parallel {
            self.ditherer.dither_to_indices_parallel(&image.pixels, image.width)
        } else {
            self.ditherer.dither_to_indices(&image.pixels, image.width)
        };

        let stats = self.ditherer.last_stats();
        tracing::debug!(
            frame = self.frames,
            reused = stats.reused,
            quantized = stats.quantized,
            diffusion_skipped = stats.diffusion_skipped,
            "Dithered frame"
        );
        self.frames += 1;

        Ok(DitheredFrame::new(
            indices,
            image.width,
            height,
            self.palette.clone(),
        ))
    }

    /// Forget the previous frame; the next frame is dithered from scratch.
    pub fn reset(&mut self) {
        self.ditherer.reset();
        self.size = None;
    }

    /// Number of frames processed since construction.
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    /// Counters for the most recent frame.
    pub fn last_stats(&self) -> FrameStats {
        self.ditherer.last_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frame_dither::{DitherAlgorithm, TemporalOptions};

    fn gradient(width: usize, height: usize) -> DecodedImage {
        let pixels = (0..width * height)
            .map(|i| {
                let v = (i * 255 / (width * height)) as u32;
                0xFF00_0000 | v << 16 | (255 - v) << 8 | v / 2
            })
            .collect();
        DecodedImage {
            width,
            height,
            pixels,
        }
    }

    fn pipeline(config: &AppConfig) -> FramePipeline {
        FramePipeline::new(config, Arc::new(Palette::eight_color())).unwrap()
    }

    #[test]
    fn test_rejects_non_diffusing_algorithm() {
        let config = AppConfig {
            algorithm: DitherAlgorithm::Bayer4,
            ..Default::default()
        };
        let result = FramePipeline::new(&config, Arc::new(Palette::eight_color()));
        assert!(matches!(result, Err(AppError::Dither(_))));
    }

    #[test]
    fn test_static_frames_are_stable() {
        let mut pipeline = pipeline(&AppConfig::default());
        let image = gradient(24, 16);

        let first = pipeline.process(&image).unwrap();
        let second = pipeline.process(&image).unwrap();

        assert_eq!(first.indices(), second.indices());
        assert_eq!(pipeline.frames_processed(), 2);
        assert_eq!(pipeline.last_stats().pixels(), 24 * 16);
    }

    #[test]
    fn test_first_frame_reuses_nothing() {
        let mut pipeline = pipeline(&AppConfig::default());
        pipeline.process(&gradient(8, 8)).unwrap();
        assert_eq!(pipeline.last_stats().reused, 0);
    }

    #[test]
    fn test_size_change_restarts_stream() {
        let mut pipeline = pipeline(&AppConfig::default());
        pipeline.process(&gradient(8, 8)).unwrap();
        pipeline.process(&gradient(8, 8)).unwrap();

        let frame = pipeline.process(&gradient(4, 6)).unwrap();
        assert_eq!((frame.width(), frame.height()), (4, 6));
        assert_eq!(pipeline.last_stats().reused, 0);
    }

    #[test]
    fn test_reset_restarts_stream() {
        let mut pipeline = pipeline(&AppConfig::default());
        let image = gradient(8, 8);
        pipeline.process(&image).unwrap();
        pipeline.reset();
        pipeline.process(&image).unwrap();
        assert_eq!(pipeline.last_stats().reused, 0);
    }

    #[test]
    fn test_parallel_single_strip_matches_sequential() {
        let image = gradient(20, 30);
        let sequential = AppConfig::default();
        let parallel = AppConfig {
            parallel: true,
            temporal: TemporalOptions::new().strips(1),
            ..Default::default()
        };

        let a = pipeline(&sequential).process(&image).unwrap();
        let b = pipeline(&parallel).process(&image).unwrap();
        assert_eq!(a.indices(), b.indices());
    }

    #[test]
    fn test_ragged_frame_is_an_error() {
        let mut pipeline = pipeline(&AppConfig::default());
        let image = DecodedImage {
            width: 5,
            height: 1,
            pixels: vec![0; 7],
        };
        assert!(matches!(pipeline.process(&image), Err(AppError::Dither(_))));
    }
}
