use anyhow::{Context, Result};
use image::DynamicImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, info};

/// Bounding box in the image the item was cut from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Data that flows through the pipeline
/// Each PipelineData is one image (a word, or a character cut from it) with its metadata
#[derive(Clone)]
pub struct PipelineData {
    /// The image data
    pub image: DynamicImage,

    /// The image the pipeline was started with (shared via Arc)
    pub original: Arc<DynamicImage>,

    /// Region of the image the producing step worked on (None means the full image).
    /// Character boxes are columns of the rotated word canvas, not of `original`;
    /// see the `rotation_angle`, `canvas_width` and `canvas_height` metadata.
    pub bbox: Option<BoundingBox>,

    /// Metadata such as "char_index" or "rotation_angle"
    pub metadata: HashMap<String, MetadataValue>,
}

/// Metadata value types
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Float(f32),
    String(String),
    Int(i32),
}

impl PipelineData {
    /// Create PipelineData for a full image
    pub fn from_image(image: DynamicImage) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            bbox: None,
            metadata: HashMap::new(),
        }
    }

    /// Create PipelineData for a region of an image
    pub fn from_region(image: DynamicImage, original: Arc<DynamicImage>, bbox: BoundingBox) -> Self {
        Self {
            image,
            original,
            bbox: Some(bbox),
            metadata: HashMap::new(),
        }
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.metadata.get(key) {
            Some(MetadataValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_float(&self, key: &str) -> Option<f32> {
        match self.metadata.get(key) {
            Some(MetadataValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.metadata.get(key) {
            Some(MetadataValue::String(v)) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug images
    pub output_dir: PathBuf,
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Process data and return transformed data
    /// Steps can split data (1 → many), filter (many → fewer), or transform (many → many)
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>>;

    /// Human-readable name, also used for debug directory names
    fn name(&self) -> &str;
}

/// Directory name for a step's debug images, e.g. "02_character_segmentation"
fn step_dir_name(step_number: usize, step_name: &str) -> String {
    format!("{:02}_{}", step_number, step_name.to_lowercase().replace(' ', "_"))
}

fn save_debug_image(dir: &Path, filename: &str, image: &DynamicImage) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create debug directory {}", dir.display()))?;
    let path = dir.join(filename);
    image
        .save(&path)
        .with_context(|| format!("Failed to save debug image {}", path.display()))?;
    debug!(path = %path.display(), "saved debug image");
    Ok(())
}

/// Work item for pipeline execution
/// Contains data and the remaining steps to execute
#[derive(Clone)]
pub struct WorkItem {
    pub data: PipelineData,

    /// Steps not yet executed
    pub remaining_steps: Vec<Arc<dyn PipelineStep>>,

    pub current_step_index: usize,

    /// IDs from previous steps that led to this item
    /// E.g., [1, 3] means: item 1 from step 1 → item 3 from step 2
    pub lineage: Vec<usize>,
}

impl WorkItem {
    pub fn new(data: PipelineData, steps: Vec<Arc<dyn PipelineStep>>) -> Self {
        Self {
            data,
            remaining_steps: steps,
            current_step_index: 0,
            lineage: vec![],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_steps.is_empty()
    }

    /// Generate filename from lineage (e.g., "01-03.png")
    pub fn lineage_filename(&self, extension: &str) -> String {
        if self.lineage.is_empty() {
            format!("01.{}", extension)
        } else {
            let ids: Vec<String> = self.lineage.iter().map(|id| format!("{:02}", id)).collect();
            format!("{}.{}", ids.join("-"), extension)
        }
    }

    fn save_debug_output(&self, context: &PipelineContext, step_name: &str) -> Result<()> {
        if let Some(debug_config) = &context.debug {
            let step_dir = debug_config
                .output_dir
                .join(step_dir_name(self.current_step_index, step_name));
            save_debug_image(&step_dir, &self.lineage_filename("png"), &self.data.image)?;
        }
        Ok(())
    }

    /// Run the next step and return one work item per result
    pub fn process_next_step(&self, context: &PipelineContext) -> Result<Vec<WorkItem>> {
        let Some(step) = self.remaining_steps.first() else {
            return Ok(vec![]);
        };
        let remaining_after = self.remaining_steps[1..].to_vec();

        let results = step
            .process(vec![self.data.clone()], context)
            .with_context(|| format!("Step '{}' failed", step.name()))?;

        let mut new_items = Vec::with_capacity(results.len());
        for (idx, result_data) in results.into_iter().enumerate() {
            let mut lineage = self.lineage.clone();
            lineage.push(idx + 1); // 1-indexed for readability

            let new_item = WorkItem {
                data: result_data,
                remaining_steps: remaining_after.clone(),
                current_step_index: self.current_step_index + 1,
                lineage,
            };
            new_item.save_debug_output(context, step.name())?;
            new_items.push(new_item);
        }

        Ok(new_items)
    }
}

/// Pipeline executor using an MPSC channel as its work queue
pub struct PipelineExecutor {
    sender: Sender<WorkItem>,
    receiver: Receiver<WorkItem>,
    context: PipelineContext,
}

impl PipelineExecutor {
    pub fn new(context: PipelineContext) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            context,
        }
    }

    fn enqueue(&self, item: WorkItem) -> Result<()> {
        self.sender
            .send(item)
            .map_err(|e| anyhow::anyhow!("Failed to send work item: {}", e))
    }

    /// Process work items until the queue is empty.
    /// Results are ordered by lineage, which is reading order for characters.
    pub fn execute(&self, initial_items: Vec<WorkItem>) -> Result<Vec<PipelineData>> {
        let mut pending = 0usize;
        for item in initial_items {
            self.enqueue(item)?;
            pending += 1;
        }

        let mut completed = Vec::new();
        while pending > 0 {
            let item = self
                .receiver
                .try_recv()
                .map_err(|e| anyhow::anyhow!("Work queue drained with {} items pending: {}", pending, e))?;
            pending -= 1;

            if item.is_complete() {
                completed.push(item);
                continue;
            }

            for new_item in item.process_next_step(&self.context)? {
                self.enqueue(new_item)?;
                pending += 1;
            }
        }

        completed.sort_by(|a, b| a.lineage.cmp(&b.lineage));
        Ok(completed.into_iter().map(|item| item.data).collect())
    }
}

/// Composable pipeline builder
#[derive(Default)]
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn add_step_boxed(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(Arc::from(step));
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    fn save_debug_input(&self, input: &DynamicImage) -> Result<()> {
        if let Some(debug_config) = &self.context.debug {
            save_debug_image(&debug_config.output_dir.join("00_input"), "01.png", input)?;
        }
        Ok(())
    }

    /// Run the pipeline step by step, passing every item through each step together
    pub fn run(&self, input: DynamicImage) -> Result<Vec<PipelineData>> {
        self.save_debug_input(&input)?;

        let mut data = vec![PipelineData::from_image(input)];

        for (step_idx, step) in self.steps.iter().enumerate() {
            info!(step = step.name(), items = data.len(), "running step");

            data = step
                .process(data, &self.context)
                .with_context(|| format!("Step '{}' failed", step.name()))?;

            if let Some(debug_config) = &self.context.debug {
                let step_dir = debug_config
                    .output_dir
                    .join(step_dir_name(step_idx + 1, step.name()));
                for (idx, item) in data.iter().enumerate() {
                    save_debug_image(&step_dir, &format!("{:02}.png", idx + 1), &item.image)?;
                }
            }

            debug!(step = step.name(), items = data.len(), "step finished");
        }

        Ok(data)
    }

    /// Run the pipeline through the work-queue executor
    pub fn run_with_executor(&self, input: DynamicImage) -> Result<Vec<PipelineData>> {
        self.save_debug_input(&input)?;

        let initial_item = WorkItem::new(PipelineData::from_image(input), self.steps.clone());
        let executor = PipelineExecutor::new(self.context.clone());
        executor.execute(vec![initial_item])
    }
}
