//! Random noise dithering.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{frame_height, Dither, Frame, InPlace, NoiseStrength, ToIndices};
use crate::color::Rgb;
use crate::palette::Palette;

/// Seed used unless one is set explicitly.
pub const DEFAULT_SEED: u64 = 0x5eed_d17e;

impl NoiseStrength {
    fn random_weight(self) -> i32 {
        match self {
            NoiseStrength::Light => 32,
            NoiseStrength::Normal => 64,
            NoiseStrength::Heavy => 128,
        }
    }
}

/// Adds uniform noise in `[-weight, weight]` to every channel before
/// resolving.
///
/// The generator is reseeded on every call, so the same input always
/// produces the same output.
#[derive(Debug, Clone)]
pub struct RandomDither {
    palette: Arc<Palette>,
    strength: NoiseStrength,
    seed: u64,
}

impl RandomDither {
    pub fn new(palette: Arc<Palette>) -> Self {
        Self {
            palette,
            strength: NoiseStrength::default(),
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_strength(mut self, strength: NoiseStrength) -> Self {
        self.strength = strength;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn scan<F: Frame>(&self, frame: &mut F, len: usize) {
        let weight = self.strength.random_weight();
        let mut rng = StdRng::seed_from_u64(self.seed);
        for idx in 0..len {
            let c = Rgb::from_packed(frame.pixel(idx)).to_i32();
            let adjusted = [
                (c[0] + rng.gen_range(-weight..=weight)).clamp(0, 255),
                (c[1] + rng.gen_range(-weight..=weight)).clamp(0, 255),
                (c[2] + rng.gen_range(-weight..=weight)).clamp(0, 255),
            ];
            frame.emit(idx, self.palette.resolve(adjusted), &self.palette);
        }
    }
}

impl Dither for RandomDither {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{black_white, BLACK};

    #[test]
    fn test_repeatable() {
        let ditherer = RandomDither::new(black_white());
        let pixels = vec![0xFF80_8080; 256];
        assert_eq!(
            ditherer.dither_to_indices(&pixels, 16),
            ditherer.dither_to_indices(&pixels, 16)
        );
    }

    #[test]
    fn test_seed_changes_pattern() {
        let pixels = vec![0xFF80_8080; 1024];
        let a = RandomDither::new(black_white()).dither_to_indices(&pixels, 32);
        let b = RandomDither::new(black_white())
            .with_seed(7)
            .dither_to_indices(&pixels, 32);
        assert_ne!(a, b);
        assert!(a.contains(&0) && a.contains(&1));
    }

    #[test]
    fn test_light_noise_keeps_black() {
        let ditherer = RandomDither::new(black_white()).with_strength(NoiseStrength::Light);
        let mut buffer = vec![BLACK; 64];
        ditherer.dither_in_place(&mut buffer, 8);
        assert!(buffer.iter().all(|&p| p == BLACK));
    }
}
