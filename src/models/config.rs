use std::path::{Path, PathBuf};
use std::str::FromStr;

use frame_dither::{
    DistanceMetric, DitherAlgorithm, DitherOptions, NoiseStrength, Palette, PaletteError, Rgb,
    TemporalOptions, EIGHT_COLOR,
};
use serde::Deserialize;

use crate::error::AppError;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Palette colors; the built-in eight color preset when absent
    #[serde(default)]
    pub palette: Option<PaletteSource>,

    /// Distance metric used to match palette colors
    #[serde(default)]
    pub distance: DistanceMetric,

    /// Dithering algorithm for still images and frame sequences
    #[serde(default)]
    pub algorithm: DitherAlgorithm,

    /// Alternate scan direction on odd rows
    #[serde(default = "default_serpentine")]
    pub serpentine: bool,

    /// Noise strength for ordered and random dithering
    #[serde(default)]
    pub strength: NoiseStrength,

    /// Temporal coherence settings for frame sequences
    #[serde(default)]
    pub temporal: TemporalOptions,

    /// Dither frame sequences in parallel strips
    #[serde(default)]
    pub parallel: bool,
}

fn default_serpentine() -> bool {
    true
}

/// Where the palette colors come from
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum PaletteSource {
    /// Inline hex colors, e.g. `["#000", "#FFFFFF"]`
    Colors(Vec<String>),

    /// Path to a JSON table of `[r, g, b]` triples (relative to the config file)
    File(PathBuf),
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// A missing or malformed file is not fatal: the defaults are used and
    /// a warning is logged.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        algorithm = %config.algorithm,
                        parallel = config.parallel,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, AppError> {
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Build the configured palette.
    ///
    /// `base_dir` resolves relative palette file paths.
    pub fn build_palette(&self, base_dir: &Path) -> Result<Palette, AppError> {
        let colors = match &self.palette {
            None => EIGHT_COLOR.to_vec(),
            Some(PaletteSource::Colors(hex)) => hex
                .iter()
                .map(|s| Rgb::from_str(s))
                .collect::<Result<Vec<_>, _>>()
                .map_err(PaletteError::from)?,
            Some(PaletteSource::File(path)) => {
                let path = base_dir.join(path);
                let json = std::fs::read_to_string(&path)?;
                Palette::colors_from_json(&json)?
            }
        };
        Ok(Palette::with_distance_metric(&colors, self.distance)?)
    }

    /// Scan options shared by every algorithm
    pub fn dither_options(&self) -> DitherOptions {
        DitherOptions::new().serpentine(self.serpentine)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            palette: None,
            distance: DistanceMetric::default(),
            algorithm: DitherAlgorithm::default(),
            serpentine: true,
            strength: NoiseStrength::default(),
            temporal: TemporalOptions::default(),
            parallel: false,
        }
    }
}
