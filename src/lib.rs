pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod segmentation;

pub use config::{InkPolarity, SegmentationConfig};
pub use error::SegmentationError;
pub use models::{
    CharacterSlice, ColumnProfile, ColumnTransform, CutCandidate, CutRun, FinalSplit, Segmentation,
    SplitLayout,
};
pub use pipeline::{
    BoundingBox, DebugConfig, MetadataValue, Pipeline, PipelineContext, PipelineData, PipelineExecutor,
    PipelineStep, WorkItem,
};
pub use segmentation::{extract_characters, CharacterSegmenter};
