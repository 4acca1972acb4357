use image::GrayImage;
use serde::Serialize;

/// A column of the trimmed profile that is thin enough to cut through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutCandidate {
    /// Index within the trimmed column profile
    pub column: usize,
    /// Skeleton pixels in that column, 0 or 1
    pub weight: u32,
}

/// Maximal run of candidates with consecutive column indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutRun {
    candidates: Vec<CutCandidate>,
}

impl CutRun {
    /// Start a run from its first candidate.
    pub fn new(first: CutCandidate) -> Self {
        Self {
            candidates: vec![first],
        }
    }

    /// Whether `candidate` directly follows the last column of this run.
    pub fn continues_with(&self, candidate: &CutCandidate) -> bool {
        self.end() + 1 == candidate.column
    }

    pub fn push(&mut self, candidate: CutCandidate) {
        self.candidates.push(candidate);
    }

    pub fn candidates(&self) -> &[CutCandidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn start(&self) -> usize {
        self.candidates[0].column
    }

    pub fn end(&self) -> usize {
        self.candidates[self.candidates.len() - 1].column
    }
}

/// A cut position in the coordinates of the (rotated) word image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinalSplit {
    pub column: u32,
    pub weight: u32,
}

/// Columns dropped from both ends of a profile. Maps trimmed indices
/// back to image columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnTransform {
    /// All-zero columns removed from the start
    pub leading: usize,
    /// All-zero columns removed from the end
    pub trailing: usize,
}

impl ColumnTransform {
    pub fn to_image_column(&self, trimmed_index: usize) -> usize {
        trimmed_index + self.leading
    }
}

/// Per-column skeleton pixel counts with empty margins removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProfile {
    counts: Vec<u32>,
    transform: ColumnTransform,
}

impl ColumnProfile {
    /// Trim leading and trailing zero columns from raw column counts.
    pub fn from_counts(raw: Vec<u32>) -> Self {
        let leading = raw.iter().take_while(|&&c| c == 0).count();
        if leading == raw.len() {
            return Self {
                counts: Vec::new(),
                transform: ColumnTransform {
                    leading,
                    trailing: 0,
                },
            };
        }
        let trailing = raw.iter().rev().take_while(|&&c| c == 0).count();
        let counts = raw[leading..raw.len() - trailing].to_vec();

        Self {
            counts,
            transform: ColumnTransform { leading, trailing },
        }
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn transform(&self) -> ColumnTransform {
        self.transform
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when the skeleton had no ink at all.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Splits found for one rotation angle together with the binary image
/// (ink 255) they index into.
#[derive(Debug, Clone)]
pub struct SplitLayout {
    pub angle: f32,
    pub splits: Vec<FinalSplit>,
    pub binary: GrayImage,
}

impl SplitLayout {
    pub fn split_count(&self) -> usize {
        self.splits.len()
    }
}

/// One character candidate cut from the winning image.
#[derive(Debug, Clone)]
pub struct CharacterSlice {
    /// First column of the strip
    pub x_start: u32,
    /// One past the last column of the strip
    pub x_end: u32,
    pub image: GrayImage,
}

impl CharacterSlice {
    pub fn width(&self) -> u32 {
        self.x_end - self.x_start
    }
}

/// Outcome of segmenting one word.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Angle of the winning layout, in degrees
    pub angle: f32,
    pub splits: Vec<FinalSplit>,
    /// Characters in reading order
    pub characters: Vec<CharacterSlice>,
    /// Split count found at every searched angle, in search order
    pub split_counts: Vec<(f32, usize)>,
}

impl Segmentation {
    pub fn into_images(self) -> Vec<GrayImage> {
        self.characters.into_iter().map(|c| c.image).collect()
    }
}
