use image::GrayImage;
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::gaussian_blur_f32;

/// Swap ink and background.
pub fn invert(img: &GrayImage) -> GrayImage {
    let mut inverted = img.clone();
    image::imageops::invert(&mut inverted);
    inverted
}

/// Gaussian smoothing. A sigma of 0 returns an unchanged copy.
pub fn smooth(img: &GrayImage, sigma: f32) -> GrayImage {
    if sigma > 0.0 {
        gaussian_blur_f32(img, sigma)
    } else {
        img.clone()
    }
}

/// Threshold an image into {0, 255} with Otsu's method.
///
/// Pixels brighter than the Otsu level become 255. A uniform image has
/// no second mode to separate and comes back entirely 0.
pub fn binarize(img: &GrayImage, sigma: f32) -> GrayImage {
    let smoothed = smooth(img, sigma);

    let first = smoothed.as_raw().first().copied();
    if smoothed.as_raw().iter().all(|&v| Some(v) == first) {
        let (width, height) = smoothed.dimensions();
        return GrayImage::new(width, height);
    }

    let level = otsu_level(&smoothed);
    threshold(&smoothed, level, ThresholdType::Binary)
}

/// Binarize a word scanned as dark ink on a light page. Returns ink as 255.
pub fn binarize_ink(word: &GrayImage, sigma: f32) -> GrayImage {
    binarize(&invert(word), sigma)
}
