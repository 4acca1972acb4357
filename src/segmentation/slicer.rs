use image::GrayImage;

use crate::models::{CharacterSlice, FinalSplit};

/// Cut an image into vertical strips at the split columns.
///
/// Strip i runs from the previous split (or column 0) up to split i; the
/// last strip runs to the right edge. The strips tile the full width in
/// reading order, so there is always one more strip than there are splits.
pub fn slice_columns(img: &GrayImage, splits: &[FinalSplit]) -> Vec<CharacterSlice> {
    let (width, height) = img.dimensions();

    let bounds = splits
        .iter()
        .map(|s| s.column.min(width))
        .chain(std::iter::once(width));

    let mut characters = Vec::with_capacity(splits.len() + 1);
    let mut x_start = 0;
    for x_end in bounds {
        let x_end = x_end.max(x_start);
        let image = image::imageops::crop_imm(img, x_start, 0, x_end - x_start, height).to_image();
        characters.push(CharacterSlice {
            x_start,
            x_end,
            image,
        });
        x_start = x_end;
    }
    characters
}
