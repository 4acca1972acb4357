//! Zhang-Suen thinning.
//!
//! Each iteration runs two sub-passes. A pass first marks every ink pixel
//! that satisfies the deletion test against the current grid, then deletes
//! the marked pixels in raster order, re-checking the test as it goes.
//! The re-check keeps two-pixel-thick shapes (a 2x2 block, a thick
//! diagonal) from vanishing entirely, so every ink component keeps a
//! connected skeleton.

use image::{GrayImage, Luma};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Peels south-east boundary pixels and north-west corners
    First,
    /// Peels north-west boundary pixels and south-east corners
    Second,
}

struct InkGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl InkGrid {
    fn from_image(img: &GrayImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width: width as usize,
            height: height as usize,
            cells: img.as_raw().iter().map(|&v| v > 0).collect(),
        }
    }

    fn get(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            return false;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    /// Neighbours P2..P9, clockwise from north.
    fn neighbours(&self, x: usize, y: usize) -> [bool; 8] {
        let (x, y) = (x as isize, y as isize);
        [
            self.get(x, y - 1),
            self.get(x + 1, y - 1),
            self.get(x + 1, y),
            self.get(x + 1, y + 1),
            self.get(x, y + 1),
            self.get(x - 1, y + 1),
            self.get(x - 1, y),
            self.get(x - 1, y - 1),
        ]
    }

    fn is_deletable(&self, index: usize, pass: Pass) -> bool {
        if !self.cells[index] {
            return false;
        }
        let p = self.neighbours(index % self.width, index / self.width);
        let [p2, _, p4, _, p6, _, p8, _] = p;

        let ink_neighbours = p.iter().filter(|&&v| v).count();
        if !(2..=6).contains(&ink_neighbours) {
            return false;
        }

        let transitions = (0..8).filter(|&i| !p[i] && p[(i + 1) % 8]).count();
        if transitions != 1 {
            return false;
        }

        match pass {
            Pass::First => !(p2 && p4 && p6) && !(p4 && p6 && p8),
            Pass::Second => !(p2 && p4 && p8) && !(p2 && p6 && p8),
        }
    }

    /// Run one sub-pass. Returns true if any pixel was removed.
    fn thin_pass(&mut self, pass: Pass) -> bool {
        let marked: Vec<usize> = (0..self.cells.len())
            .filter(|&i| self.is_deletable(i, pass))
            .collect();

        let mut changed = false;
        for index in marked {
            if self.is_deletable(index, pass) {
                self.cells[index] = false;
                changed = true;
            }
        }
        changed
    }
}

/// Reduce ink (non-zero) regions to a one pixel wide skeleton.
///
/// Skeleton pixels are always a subset of the input ink and come back as
/// 255 on 0. An image without ink comes back without ink.
pub fn skeletonize(binary: &GrayImage) -> GrayImage {
    let mut grid = InkGrid::from_image(binary);

    loop {
        let first = grid.thin_pass(Pass::First);
        let second = grid.thin_pass(Pass::Second);
        if !first && !second {
            break;
        }
    }

    let (width, height) = binary.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        if grid.get(x as isize, y as isize) {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
