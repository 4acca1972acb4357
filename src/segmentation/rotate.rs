use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

use crate::segmentation::binarize::invert;

/// Canvas size that holds a `width` x `height` image rotated by `degrees`.
pub fn rotated_bounds(width: u32, height: u32, degrees: f32) -> (u32, u32) {
    let theta = degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let (w, h) = (width as f32, height as f32);

    let new_width = (h * sin + w * cos) as u32;
    let new_height = (h * cos + w * sin) as u32;
    (new_width.max(1), new_height.max(1))
}

/// Rotate a word about its centre, growing the canvas so nothing is clipped.
///
/// Positive angles turn the word clockwise. The image is inverted before
/// warping so the uncovered corners fill with page colour rather than ink.
pub fn rotate_word(word: &GrayImage, degrees: f32) -> GrayImage {
    if degrees == 0.0 {
        return word.clone();
    }

    let (width, height) = word.dimensions();
    let (new_width, new_height) = rotated_bounds(width, height, degrees);

    let projection = Projection::translate(new_width as f32 / 2.0, new_height as f32 / 2.0)
        * Projection::rotate(degrees.to_radians())
        * Projection::translate(-(width as f32) / 2.0, -(height as f32) / 2.0);

    let inverted = invert(word);
    let mut rotated = GrayImage::new(new_width, new_height);
    warp_into(
        &inverted,
        &projection,
        Interpolation::Bilinear,
        Luma([0u8]),
        &mut rotated,
    );

    invert(&rotated)
}
