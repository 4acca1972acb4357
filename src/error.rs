use thiserror::Error;

/// Errors that can occur while segmenting a word image into characters.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SegmentationError {
    #[error("invalid word image: {width}x{height} has no pixels")]
    InvalidImage { width: u32, height: u32 },

    #[error("rotation angle {angle} is not a finite number of degrees")]
    InvalidAngle { angle: f32 },

    #[error("no rotation angles configured")]
    EmptyAngleSet,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SegmentationError>;
