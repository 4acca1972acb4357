pub mod angles;
pub mod binarize;
pub mod cuts;
pub mod profile;
pub mod rotate;
pub mod skeleton;
pub mod slicer;
pub mod steps;

use image::GrayImage;
use tracing::{info, warn};

use crate::config::{InkPolarity, SegmentationConfig};
use crate::error::{Result, SegmentationError};
use crate::models::Segmentation;

/// Splits a word image into character images
#[derive(Debug, Clone, Default)]
pub struct CharacterSegmenter {
    config: SegmentationConfig,
}

impl CharacterSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SegmentationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Search all rotation angles, keep the one that yields the most
    /// cuts and slice its binarized image into characters.
    pub fn segment(&self, word: &GrayImage) -> Result<Segmentation> {
        let (width, height) = word.dimensions();
        if width == 0 || height == 0 {
            return Err(SegmentationError::InvalidImage { width, height });
        }
        self.config.validate()?;

        let mut layouts = angles::evaluate_all(word, &self.config)?;
        let split_counts = layouts
            .iter()
            .map(|l| (l.angle, l.split_count()))
            .collect();
        let winner_index = angles::select_layout(&layouts, self.config.default_angle_index());
        let winner = layouts.swap_remove(winner_index);

        if winner.binary.as_raw().iter().all(|&v| v == 0) {
            warn!(width, height, "word image has no ink, returning it as one character");
        }

        let sliced = match self.config.output_polarity {
            InkPolarity::DarkInk => binarize::invert(&winner.binary),
            InkPolarity::LightInk => winner.binary,
        };
        let characters = slicer::slice_columns(&sliced, &winner.splits);

        info!(
            angle = winner.angle,
            splits = winner.splits.len(),
            characters = characters.len(),
            "segmented word"
        );

        Ok(Segmentation {
            angle: winner.angle,
            splits: winner.splits,
            characters,
            split_counts,
        })
    }

    /// Character images of a word in reading order.
    pub fn extract_characters(&self, word: &GrayImage) -> Result<Vec<GrayImage>> {
        Ok(self.segment(word)?.into_images())
    }
}

/// Segment a word with the default configuration.
pub fn extract_characters(word: &GrayImage) -> Result<Vec<GrayImage>> {
    CharacterSegmenter::new().extract_characters(word)
}
