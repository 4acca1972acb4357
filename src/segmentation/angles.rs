use image::GrayImage;
use rayon::prelude::*;
use tracing::debug;

use crate::config::SegmentationConfig;
use crate::error::{Result, SegmentationError};
use crate::models::SplitLayout;
use crate::segmentation::{binarize, cuts, profile, rotate, skeleton};

/// Rotate the word by `angle` degrees and find its cut columns.
pub fn evaluate(word: &GrayImage, angle: f32, config: &SegmentationConfig) -> Result<SplitLayout> {
    if !angle.is_finite() {
        return Err(SegmentationError::InvalidAngle { angle });
    }

    let rotated = rotate::rotate_word(word, angle);
    let binary = binarize::binarize_ink(&rotated, config.smoothing_sigma);
    let skeleton = skeleton::skeletonize(&binary);
    let profile = profile::column_profile(&skeleton);
    let splits = cuts::find_splits(&profile, config.min_run_length);

    debug!(
        angle,
        width = binary.width(),
        profile_width = profile.len(),
        splits = splits.len(),
        "evaluated rotation"
    );

    Ok(SplitLayout {
        angle,
        splits,
        binary,
    })
}

/// Evaluate every configured angle. The result keeps the configured order
/// whether or not the angles ran in parallel; any failure aborts the search.
pub fn evaluate_all(word: &GrayImage, config: &SegmentationConfig) -> Result<Vec<SplitLayout>> {
    if config.angles.is_empty() {
        return Err(SegmentationError::EmptyAngleSet);
    }

    if config.parallel {
        config
            .angles
            .par_iter()
            .map(|&angle| evaluate(word, angle, config))
            .collect()
    } else {
        config
            .angles
            .iter()
            .map(|&angle| evaluate(word, angle, config))
            .collect()
    }
}

/// Pick the layout with the most splits.
///
/// Starts from `default_index` and moves to a layout with strictly more
/// splits. Between layouts with equal split counts the smaller rotation
/// wins, and on equal magnitude the current winner stays.
pub fn select_layout(layouts: &[SplitLayout], default_index: usize) -> usize {
    let mut best = default_index.min(layouts.len().saturating_sub(1));
    for (i, layout) in layouts.iter().enumerate() {
        let current = &layouts[best];
        let more_splits = layout.split_count() > current.split_count();
        let same_splits_less_rotation =
            layout.split_count() == current.split_count() && layout.angle.abs() < current.angle.abs();
        if more_splits || same_splits_less_rotation {
            best = i;
        }
    }
    best
}
