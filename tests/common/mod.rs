mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from charsplit for tests
pub use charsplit::segmentation::{angles, binarize, cuts, profile, rotate, skeleton, slicer};
pub use charsplit::{
    CharacterSegmenter, ColumnProfile, CutCandidate, FinalSplit, InkPolarity, SegmentationConfig,
    SegmentationError, SplitLayout,
};
