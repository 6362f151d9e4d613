//! Error diffusion over any [`Kernel`].

use std::sync::Arc;

use super::fast_path::{self, Backend};
use super::{diffuse_frame, frame_height, Dither, DitherOptions, Frame, InPlace, Kernel, ToIndices};
use crate::palette::Palette;

/// Error diffusion ditherer for one kernel and one shared palette.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use frame_dither::{Dither, ErrorDiffusionDither, Palette, FLOYD_STEINBERG};
///
/// let palette = Arc::new(Palette::from_hex(&["#000", "#fff"]).unwrap());
/// let ditherer = ErrorDiffusionDither::new(palette, FLOYD_STEINBERG);
///
/// let indices = ditherer.dither_to_indices(&[0xFF808080; 16], 4);
/// assert!(indices.iter().any(|&i| i == 0) && indices.iter().any(|&i| i == 1));
/// ```
#[derive(Debug, Clone)]
pub struct ErrorDiffusionDither {
    palette: Arc<Palette>,
    kernel: Kernel,
    options: DitherOptions,
    backend: Backend,
}

impl ErrorDiffusionDither {
    /// Create a ditherer using the fastest backend available for `kernel`.
    pub fn new(palette: Arc<Palette>, kernel: Kernel) -> Self {
        Self {
            palette,
            backend: Backend::select(&kernel),
            kernel,
            options: DitherOptions::default(),
        }
    }

    /// Replace the scan options.
    #[inline]
    pub fn with_options(mut self, options: DitherOptions) -> Self {
        self.options = options;
        self
    }

    /// Force a backend. [`Backend::FastPath`] falls back to the portable
    /// driver for kernels without a specialized routine.
    #[inline]
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Diffusion kernel.
    #[inline]
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Scan options.
    #[inline]
    pub fn options(&self) -> &DitherOptions {
        &self.options
    }

    /// Selected backend.
    #[inline]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    fn scan<F: Frame>(&self, frame: &mut F, width: usize, height: usize) {
        match self.backend {
            Backend::FastPath if fast_path::supports(&self.kernel) => {
                fast_path::filter_lite(frame, width, height, &self.palette, &self.options)
            }
            _ => diffuse_frame(
                frame,
                width,
                height,
                &self.palette,
                &self.kernel,
                &self.options,
            ),
        }
    }
}

impl Dither for ErrorDiffusionDither {
    fn palette(&self) -> &Palette {
        &self.palette
    }

    fn dither_in_place(&self, buffer: &mut [u32], width: usize) {
        let height = frame_height(buffer.len(), width);
        self.scan(&mut InPlace(buffer), width, height);
    }

    fn dither_to_indices(&self, buffer: &[u32], width: usize) -> Vec<u8> {
        let height = frame_height(buffer.len(), width);
        let mut out = vec![0u8; buffer.len()];
        self.scan(
            &mut ToIndices {
                pixels: buffer,
                out: &mut out,
            },
            width,
            height,
        );
        out
    }
}
