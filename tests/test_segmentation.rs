//! Integration tests for the `extract_characters` entry point.
//!
//! Tests cover:
//! - Zero-area input is rejected
//! - Blank words come back as a single character
//! - Count, coverage and ordering of the character strips
//! - Determinism across runs
//! - Configuration loading and validation

mod common;

use charsplit::extract_characters;
use common::*;
use image::GrayImage;
use std::io::Write;

#[test]
fn test_zero_area_image_is_rejected() {
    let err = extract_characters(&GrayImage::new(0, 12)).unwrap_err();
    assert_eq!(err, SegmentationError::InvalidImage { width: 0, height: 12 });

    let err = extract_characters(&GrayImage::new(12, 0)).unwrap_err();
    assert_eq!(err, SegmentationError::InvalidImage { width: 12, height: 0 });
}

#[test]
fn test_blank_word_is_one_character() -> anyhow::Result<()> {
    let segmentation = CharacterSegmenter::new().segment(&blank_word(30, 12))?;

    assert!(segmentation.splits.is_empty());
    assert_eq!(segmentation.angle, 0.0);
    assert_eq!(segmentation.characters.len(), 1);
    assert_eq!(segmentation.characters[0].x_start, 0);
    assert_eq!(segmentation.characters[0].x_end, 30);
    assert_eq!(segmentation.characters[0].image.dimensions(), (30, 12));
    Ok(())
}

#[test]
fn test_one_pixel_word() -> anyhow::Result<()> {
    let characters = extract_characters(&blank_word(1, 1))?;
    assert_eq!(characters.len(), 1);
    assert_eq!(characters[0].dimensions(), (1, 1));
    Ok(())
}

#[test]
fn test_three_bars_give_three_characters() -> anyhow::Result<()> {
    let characters = extract_characters(&three_bars())?;

    assert_eq!(characters.len(), 3);
    for (i, character) in characters.iter().enumerate() {
        assert!(has_dark_ink(character), "character {} should contain its bar", i);
        assert_eq!(character.height(), 40);
    }
    Ok(())
}

#[test]
fn test_strips_tile_the_winning_image() -> anyhow::Result<()> {
    let word = three_bars();
    let config = SegmentationConfig::default().with_angles(vec![0.0]);
    let segmentation = CharacterSegmenter::with_config(config).segment(&word)?;

    // 1. One more strip than splits, contiguous and in reading order
    assert_eq!(segmentation.characters.len(), segmentation.splits.len() + 1);
    let mut expected_start = 0;
    for character in &segmentation.characters {
        assert_eq!(character.x_start, expected_start);
        assert!(character.x_end > character.x_start);
        expected_start = character.x_end;
    }
    assert_eq!(expected_start, word.width());

    // 2. Strip edges sit on the split columns
    let starts: Vec<u32> = segmentation.characters[1..].iter().map(|c| c.x_start).collect();
    let columns: Vec<u32> = segmentation.splits.iter().map(|s| s.column).collect();
    assert_eq!(starts, columns);

    // 3. Joined back together they reproduce the thresholded word
    let strips: Vec<GrayImage> = segmentation.characters.iter().map(|c| c.image.clone()).collect();
    let expected = binarize::invert(&binarize::binarize_ink(&word, 0.0));
    assert_eq!(concat_columns(&strips), expected);
    Ok(())
}

#[test]
fn test_segmentation_is_deterministic() -> anyhow::Result<()> {
    let segmenter = CharacterSegmenter::new();
    for word in [three_bars(), slanted_pair(false), slanted_pair(true)] {
        let first = segmenter.segment(&word)?;
        let second = segmenter.segment(&word)?;

        assert_eq!(first.angle, second.angle);
        assert_eq!(first.splits, second.splits);
        assert_eq!(first.split_counts, second.split_counts);
        let first_images: Vec<_> = first.characters.iter().map(|c| c.image.as_raw()).collect();
        let second_images: Vec<_> = second.characters.iter().map(|c| c.image.as_raw()).collect();
        assert_eq!(first_images, second_images);
    }
    Ok(())
}

#[test]
fn test_light_ink_polarity() -> anyhow::Result<()> {
    let config = SegmentationConfig::default().with_output_polarity(InkPolarity::LightInk);
    let characters = CharacterSegmenter::with_config(config).extract_characters(&three_bars())?;

    assert_eq!(characters.len(), 3);
    // Background is 0 and ink is 255
    assert_eq!(characters[0].get_pixel(0, 0)[0], 0);
    assert!(characters.iter().all(|c| ink_pixels(c) > 0));
    Ok(())
}

#[test]
fn test_single_column_runs_policy() -> anyhow::Result<()> {
    // Bars one blank column apart: the only gap is a single column
    let word = bars_word(30, 30, &[(5, 1), (7, 1)]);
    let default = CharacterSegmenter::with_config(SegmentationConfig::default().with_angles(vec![0.0]));
    assert_eq!(default.segment(&word)?.splits.len(), 0);

    let keep_single = SegmentationConfig::default()
        .with_angles(vec![0.0])
        .with_min_run_length(1);
    let segmentation = CharacterSegmenter::with_config(keep_single).segment(&word)?;
    assert_eq!(segmentation.splits, vec![FinalSplit { column: 6, weight: 0 }]);
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SegmentationConfig::default().with_min_run_length(0);
    assert!(matches!(
        CharacterSegmenter::with_config(config).segment(&three_bars()),
        Err(SegmentationError::InvalidConfig(_))
    ));

    let config = SegmentationConfig::default().with_smoothing_sigma(-1.0);
    assert!(matches!(config.validate(), Err(SegmentationError::InvalidConfig(_))));
}

#[test]
fn test_config_from_json() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    write!(file, r#"{{ "angles": [-5.0, 0.0, 5.0], "min_run_length": 1, "output_polarity": "light_ink" }}"#)?;

    let config = SegmentationConfig::from_json(file.path())?;
    assert_eq!(config.angles, vec![-5.0, 0.0, 5.0]);
    assert_eq!(config.min_run_length, 1);
    assert_eq!(config.output_polarity, InkPolarity::LightInk);
    // Unlisted fields keep their defaults
    assert!(config.parallel);
    assert_eq!(config.smoothing_sigma, 0.0);
    Ok(())
}

#[test]
fn test_config_from_json_rejects_empty_angles() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    write!(file, r#"{{ "angles": [] }}"#)?;

    assert!(SegmentationConfig::from_json(file.path()).is_err());
    Ok(())
}

#[test]
fn test_slicer_cuts_at_split_columns() {
    let img = GrayImage::from_fn(10, 4, |x, _| image::Luma([x as u8]));
    let splits = [FinalSplit { column: 3, weight: 0 }, FinalSplit { column: 7, weight: 1 }];
    let strips = slicer::slice_columns(&img, &splits);

    let ranges: Vec<(u32, u32)> = strips.iter().map(|s| (s.x_start, s.x_end)).collect();
    assert_eq!(ranges, vec![(0, 3), (3, 7), (7, 10)]);
    assert_eq!(strips[1].image.get_pixel(0, 0)[0], 3);
    assert_eq!(strips[2].image.get_pixel(2, 3)[0], 9);
}
