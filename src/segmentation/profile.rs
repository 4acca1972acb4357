use image::GrayImage;

use crate::models::ColumnProfile;

/// Count the ink pixels in every column.
pub fn column_counts(img: &GrayImage) -> Vec<u32> {
    let mut counts = vec![0u32; img.width() as usize];
    for (x, _, pixel) in img.enumerate_pixels() {
        if pixel[0] > 0 {
            counts[x as usize] += 1;
        }
    }
    counts
}

/// Column profile of a skeleton with its empty margins trimmed.
pub fn column_profile(skeleton: &GrayImage) -> ColumnProfile {
    ColumnProfile::from_counts(column_counts(skeleton))
}
