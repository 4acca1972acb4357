use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmentationError};

/// Rotation angles searched by default, in degrees, centred on 0.
pub const DEFAULT_ANGLES: [f32; 5] = [-7.0, -3.0, 0.0, 3.0, 7.0];

/// Polarity of the character images handed to the next stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InkPolarity {
    /// Ink 0 on a 255 background, like the scanned page.
    #[default]
    DarkInk,
    /// Ink 255 on a 0 background, like the analysed binary image.
    LightInk,
}

/// All segmentation parameters in one struct.
/// Serializable so presets can be stored next to a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Rotation angles (degrees) to evaluate. The angle closest to 0
    /// is the tie-break default.
    pub angles: Vec<f32>,

    /// Gaussian sigma applied before Otsu thresholding. 0 leaves the
    /// image untouched (a 1x1 kernel).
    pub smoothing_sigma: f32,

    /// Shortest run of consecutive 0/1 columns that may become a split.
    /// 2 ignores isolated thin columns; 1 turns every interior run into a split.
    pub min_run_length: usize,

    /// Evaluate the angles on the rayon thread pool.
    pub parallel: bool,

    /// Polarity of the sliced character images.
    pub output_polarity: InkPolarity,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            angles: DEFAULT_ANGLES.to_vec(),
            smoothing_sigma: 0.0,
            min_run_length: 2,
            parallel: true,
            output_polarity: InkPolarity::DarkInk,
        }
    }
}

impl SegmentationConfig {
    /// Load a preset from a JSON file. Missing fields take their defaults.
    pub fn from_json(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_angles(mut self, angles: impl Into<Vec<f32>>) -> Self {
        self.angles = angles.into();
        self
    }

    pub fn with_smoothing_sigma(mut self, sigma: f32) -> Self {
        self.smoothing_sigma = sigma;
        self
    }

    pub fn with_min_run_length(mut self, len: usize) -> Self {
        self.min_run_length = len;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_output_polarity(mut self, polarity: InkPolarity) -> Self {
        self.output_polarity = polarity;
        self
    }

    /// Index of the angle used when no rotation produces more splits:
    /// the one closest to 0, first on ties.
    pub fn default_angle_index(&self) -> usize {
        let mut best = 0;
        for (i, angle) in self.angles.iter().enumerate() {
            if angle.abs() < self.angles[best].abs() {
                best = i;
            }
        }
        best
    }

    pub fn validate(&self) -> Result<()> {
        if self.angles.is_empty() {
            return Err(SegmentationError::EmptyAngleSet);
        }
        if let Some(&angle) = self.angles.iter().find(|a| !a.is_finite()) {
            return Err(SegmentationError::InvalidAngle { angle });
        }
        if !self.smoothing_sigma.is_finite() || self.smoothing_sigma < 0.0 {
            return Err(SegmentationError::InvalidConfig(format!(
                "smoothing_sigma must be a finite value >= 0, got {}",
                self.smoothing_sigma
            )));
        }
        if self.min_run_length == 0 {
            return Err(SegmentationError::InvalidConfig(
                "min_run_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
