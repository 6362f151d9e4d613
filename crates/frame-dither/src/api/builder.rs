//! Ditherer builder: the primary entry point.

use std::sync::Arc;

use super::DitherError;
use crate::dither::{
    checked_height, Backend, BayerSize, Dither, DitherAlgorithm, DitherOptions,
    ErrorDiffusionDither, NearestDither, NoiseStrength, OrderedDither, RandomDither, DEFAULT_SEED,
};
use crate::output::DitheredFrame;
use crate::palette::Palette;
use crate::temporal::{TemporalDither, TemporalOptions};

/// High-level dithering builder.
///
/// # Design
///
/// - Constructor requires a [`Palette`] (no invalid states)
/// - Configuration methods consume and return `self`
/// - Dithering methods take `&self`, so one builder serves many frames
/// - Dimension errors are returned, not panicked
///
/// # Example
///
/// ```
/// use frame_dither::{DitherAlgorithm, Ditherer, Palette};
///
/// let palette = Palette::from_hex(&["#000", "#fff"]).unwrap();
/// let ditherer = Ditherer::new(palette).algorithm(DitherAlgorithm::Atkinson);
///
/// let frame = ditherer.dither_frame(&[0xFF808080; 6], 3).unwrap();
/// assert_eq!(frame.height(), 2);
///
/// assert!(ditherer.try_dither_to_indices(&[0; 5], 2).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Ditherer {
    palette: Arc<Palette>,
    algorithm: DitherAlgorithm,
    options: DitherOptions,
    strength: NoiseStrength,
    seed: u64,
    backend: Option<Backend>,
}

impl Ditherer {
    /// Create a ditherer with the default algorithm (Floyd-Steinberg).
    pub fn new(palette: impl Into<Arc<Palette>>) -> Self {
        Self {
            palette: palette.into(),
            algorithm: DitherAlgorithm::default(),
            options: DitherOptions::default(),
            strength: NoiseStrength::default(),
            seed: DEFAULT_SEED,
            backend: None,
        }
    }

    /// Set the dithering algorithm.
    #[inline]
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set serpentine scanning mode.
    #[inline]
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.options.serpentine = enabled;
        self
    }

    /// Replace all scan options.
    #[inline]
    pub fn options(mut self, options: DitherOptions) -> Self {
        self.options = options;
        self
    }

    /// Noise level for ordered and random dithering.
    #[inline]
    pub fn strength(mut self, strength: NoiseStrength) -> Self {
        self.strength = strength;
        self
    }

    /// Seed for random dithering.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Force an error diffusion backend instead of auto-detecting one.
    #[inline]
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    #[inline]
    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    #[inline]
    pub fn selected_algorithm(&self) -> DitherAlgorithm {
        self.algorithm
    }

    /// Instantiate the configured algorithm.
    pub fn build(&self) -> Box<dyn Dither> {
        let palette = self.palette.clone();
        if let Some(kernel) = self.algorithm.kernel() {
            let mut ditherer =
                ErrorDiffusionDither::new(palette, kernel).with_options(self.options.clone());
            if let Some(backend) = self.backend {
                ditherer = ditherer.with_backend(backend);
            }
            return Box::new(ditherer);
        }

        match self.algorithm {
            DitherAlgorithm::Bayer2 => self.ordered(BayerSize::Two),
            DitherAlgorithm::Bayer4 => self.ordered(BayerSize::Four),
            DitherAlgorithm::Bayer8 => self.ordered(BayerSize::Eight),
            DitherAlgorithm::Random => Box::new(
                RandomDither::new(palette)
                    .with_strength(self.strength)
                    .with_seed(self.seed),
            ),
            _ => Box::new(NearestDither::new(palette)),
        }
    }

    fn ordered(&self, size: BayerSize) -> Box<dyn Dither> {
        Box::new(OrderedDither::new(self.palette.clone(), size).with_strength(self.strength))
    }

    /// Temporal ditherer for a frame stream, using the configured kernel.
    ///
    /// # Errors
    ///
    /// [`DitherError::NotErrorDiffusion`] if the algorithm has no kernel.
    pub fn temporal(&self, options: TemporalOptions) -> Result<TemporalDither, DitherError> {
        let kernel = self
            .algorithm
            .kernel()
            .ok_or(DitherError::NotErrorDiffusion(self.algorithm))?;
        Ok(TemporalDither::new(self.palette.clone(), kernel)
            .with_options(options)
            .with_dither_options(self.options.clone()))
    }

    /// Palette indices for `pixels`, or an error for a bad frame shape.
    pub fn try_dither_to_indices(
        &self,
        pixels: &[u32],
        width: usize,
    ) -> Result<Vec<u8>, DitherError> {
        checked_height(pixels.len(), width)?;
        Ok(self.build().dither_to_indices(pixels, width))
    }

    /// Dither `buffer` in place, or return an error for a bad frame shape.
    pub fn try_dither_in_place(&self, buffer: &mut [u32], width: usize) -> Result<(), DitherError> {
        checked_height(buffer.len(), width)?;
        self.build().dither_in_place(buffer, width);
        Ok(())
    }

    /// Dither `pixels` into a [`DitheredFrame`].
    pub fn dither_frame(&self, pixels: &[u32], width: usize) -> Result<DitheredFrame, DitherError> {
        let height = checked_height(pixels.len(), width)?;
        let indices = self.build().dither_to_indices(pixels, width);
        Ok(DitheredFrame::new(indices, width, height, self.palette.clone()))
    }
}
