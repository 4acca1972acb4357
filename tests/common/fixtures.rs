use image::{GrayImage, Luma};

pub const PAPER: u8 = 255;
pub const INK: u8 = 0;

/// A blank sheet with no ink.
pub fn blank_word(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([PAPER]))
}

/// Dark vertical bars on white paper. Each bar is `(x, width)` and spans rows 5..height-5.
pub fn bars_word(width: u32, height: u32, bars: &[(u32, u32)]) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let in_bar = bars.iter().any(|&(bx, bw)| x >= bx && x < bx + bw);
        if in_bar && y >= 5 && y < height - 5 {
            Luma([INK])
        } else {
            Luma([PAPER])
        }
    })
}

/// Three well separated bars: three characters at every searched angle.
pub fn three_bars() -> GrayImage {
    bars_word(48, 40, &[(6, 4), (20, 4), (34, 4)])
}

/// Two parallel strokes slanted 7 degrees from vertical whose column
/// ranges overlap, so no gap column exists until the word is rotated
/// upright. `mirror` flips the slant direction.
pub fn slanted_pair(mirror: bool) -> GrayImage {
    let (width, height) = (60u32, 100u32);
    let (top, bottom) = (10u32, 90u32);
    let slope = 7f32.to_radians().tan();

    let word = GrayImage::from_fn(width, height, |x, y| {
        if y < top || y >= bottom {
            return Luma([PAPER]);
        }
        let shift = ((bottom - 1 - y) as f32 * slope).round() as u32;
        let inked = [20u32, 28].iter().any(|&x0| x >= x0 + shift && x < x0 + shift + 3);
        if inked { Luma([INK]) } else { Luma([PAPER]) }
    });

    if mirror {
        image::imageops::flip_horizontal(&word)
    } else {
        word
    }
}

/// Number of ink pixels (value > 0) in a binary image.
pub fn ink_pixels(img: &GrayImage) -> usize {
    img.pixels().filter(|p| p[0] > 0).count()
}

/// Whether a dark-ink image has any ink in it.
pub fn has_dark_ink(img: &GrayImage) -> bool {
    img.pixels().any(|p| p[0] == INK)
}

/// Join strips left to right into one image.
pub fn concat_columns(strips: &[GrayImage]) -> GrayImage {
    let height = strips.first().map(|s| s.height()).unwrap_or(0);
    let width = strips.iter().map(|s| s.width()).sum();
    let mut joined = GrayImage::new(width, height);
    let mut x = 0i64;
    for strip in strips {
        image::imageops::replace(&mut joined, strip, x, 0);
        x += strip.width() as i64;
    }
    joined
}
