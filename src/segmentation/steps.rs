use crate::error::SegmentationError;
use crate::pipeline::{BoundingBox, MetadataValue, PipelineContext, PipelineData, PipelineStep};
use crate::segmentation::CharacterSegmenter;
use anyhow::Result;
use image::{DynamicImage, GrayImage, Luma};

/// Convert any input image to a single channel
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .into_iter()
            .map(|item| PipelineData {
                image: DynamicImage::ImageLuma8(item.image.to_luma8()),
                ..item
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Split each word image into character images (1 → many)
pub struct CharacterSegmentationStep {
    pub segmenter: CharacterSegmenter,
}

impl CharacterSegmentationStep {
    pub fn new(segmenter: CharacterSegmenter) -> Self {
        Self { segmenter }
    }
}

impl PipelineStep for CharacterSegmentationStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let word = item.image.to_luma8();
            let segmentation = self.segmenter.segment(&word)?;
            let split_count = segmentation.splits.len() as i32;
            let angle = segmentation.angle;
            let weights: Vec<u32> = segmentation.splits.iter().map(|s| s.weight).collect();
            let canvas_width = segmentation.characters.last().map_or(0, |c| c.x_end);
            let canvas_height = segmentation.characters.first().map_or(0, |c| c.image.height());

            // Bounding boxes are columns of the rotated word the cuts were made in
            for (index, character) in segmentation.characters.into_iter().enumerate() {
                let bbox = BoundingBox {
                    x: character.x_start,
                    y: 0,
                    width: character.width(),
                    height: character.image.height(),
                };
                let mut character_data = PipelineData::from_region(
                    DynamicImage::ImageLuma8(character.image),
                    item.original.clone(),
                    bbox,
                )
                .with_metadata("char_index", MetadataValue::Int(index as i32))
                .with_metadata("rotation_angle", MetadataValue::Float(angle))
                .with_metadata("split_count", MetadataValue::Int(split_count))
                .with_metadata("x_start", MetadataValue::Int(character.x_start as i32))
                .with_metadata("x_end", MetadataValue::Int(character.x_end as i32))
                .with_metadata("canvas_width", MetadataValue::Int(canvas_width as i32))
                .with_metadata("canvas_height", MetadataValue::Int(canvas_height as i32));

                // Weight of the cut on this character's left edge
                if let Some(weight) = index.checked_sub(1).and_then(|i| weights.get(i)) {
                    character_data
                        .metadata
                        .insert("split_weight".to_string(), MetadataValue::Int(*weight as i32));
                }
                for (key, value) in &item.metadata {
                    character_data
                        .metadata
                        .entry(key.clone())
                        .or_insert_with(|| value.clone());
                }
                result.push(character_data);
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Character Segmentation"
    }
}

/// Fit each character into a square canvas, keeping its aspect ratio
pub struct NormalizeCharacterStep {
    pub target_size: u32,
    /// Canvas colour, 255 for dark ink on white
    pub background: u8,
}

impl NormalizeCharacterStep {
    pub fn new(target_size: u32) -> Self {
        Self {
            target_size,
            background: 255,
        }
    }

    pub fn with_background(mut self, background: u8) -> Self {
        self.background = background;
        self
    }

    fn normalize(&self, gray: &GrayImage) -> GrayImage {
        let (width, height) = gray.dimensions();
        let mut canvas = GrayImage::from_pixel(self.target_size, self.target_size, Luma([self.background]));
        if width == 0 || height == 0 {
            return canvas;
        }

        let scale = (self.target_size as f32 / width as f32).min(self.target_size as f32 / height as f32);
        let scaled_w = ((width as f32 * scale) as u32).clamp(1, self.target_size);
        let scaled_h = ((height as f32 * scale) as u32).clamp(1, self.target_size);

        let scaled = image::imageops::resize(gray, scaled_w, scaled_h, image::imageops::FilterType::CatmullRom);

        let offset_x = (self.target_size - scaled_w) / 2;
        let offset_y = (self.target_size - scaled_h) / 2;
        image::imageops::overlay(&mut canvas, &scaled, offset_x.into(), offset_y.into());
        canvas
    }
}

impl PipelineStep for NormalizeCharacterStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        if self.target_size == 0 {
            return Err(SegmentationError::InvalidConfig(
                "normalize target size must be at least 1".to_string(),
            )
            .into());
        }

        Ok(data
            .into_iter()
            .map(|item| {
                let normalized = self.normalize(&item.image.to_luma8());
                PipelineData {
                    image: DynamicImage::ImageLuma8(normalized),
                    ..item
                }
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Character Normalization"
    }
}
