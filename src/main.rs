use anyhow::Context;
use clap::Parser;
use image::ImageReader;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use charsplit::segmentation::steps::*;
use charsplit::{CharacterSegmenter, FinalSplit, InkPolarity, Pipeline, PipelineData, SegmentationConfig};

#[derive(Parser)]
#[command(name = "charsplit")]
#[command(about = "Cut an image of a handwritten word into character images")]
struct Cli {
    /// Path to the word image
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// JSON file with segmentation settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Rotation angles to search, in degrees (e.g. "-7,-3,0,3,7")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    angles: Option<Vec<f32>>,

    /// Shortest run of thin columns that may become a cut
    #[arg(long, value_name = "N")]
    min_run_length: Option<usize>,

    /// Evaluate angles one after another instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Write characters as light ink on a dark background
    #[arg(long)]
    light_ink: bool,

    /// Fit every character into an N x N canvas
    #[arg(long, value_name = "N")]
    normalize_size: Option<u32>,

    /// Save character images to this directory
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Write a JSON report of the chosen cuts
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[derive(Serialize)]
struct CharacterReport {
    index: usize,
    x_start: i32,
    x_end: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report {
    image: PathBuf,
    angle: f32,
    splits: Vec<FinalSplit>,
    characters: Vec<CharacterReport>,
}

fn init_logging(args: &Cli) {
    let default_level = if args.verbose {
        tracing_subscriber::filter::LevelFilter::DEBUG
    } else {
        tracing_subscriber::filter::LevelFilter::INFO
    };
    let level = args
        .log_level
        .as_deref()
        .and_then(|l| l.parse::<tracing_subscriber::filter::LevelFilter>().ok())
        .unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Cli) -> anyhow::Result<SegmentationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            SegmentationConfig::from_json(path)?
        }
        None => SegmentationConfig::default(),
    };

    if let Some(angles) = &args.angles {
        config = config.with_angles(angles.clone());
    }
    if let Some(len) = args.min_run_length {
        config = config.with_min_run_length(len);
    }
    if args.sequential {
        config = config.with_parallel(false);
    }
    if args.light_ink {
        config = config.with_output_polarity(InkPolarity::LightInk);
    }

    config.validate()?;
    Ok(config)
}

fn save_characters(dir: &Path, characters: &[PipelineData]) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut paths = Vec::with_capacity(characters.len());
    for (i, item) in characters.iter().enumerate() {
        let path = dir.join(format!("char_{:02}.png", i + 1));
        item.image
            .save(&path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
        paths.push(path);
    }
    Ok(paths)
}

fn build_report(image: &Path, characters: &[PipelineData], files: &[PathBuf]) -> Report {
    let angle = characters
        .first()
        .and_then(|c| c.get_float("rotation_angle"))
        .unwrap_or(0.0);

    let splits = characters
        .iter()
        .skip(1)
        .map(|c| FinalSplit {
            column: c.get_int("x_start").unwrap_or(0) as u32,
            weight: c.get_int("split_weight").unwrap_or(0) as u32,
        })
        .collect();

    let characters = characters
        .iter()
        .enumerate()
        .map(|(index, c)| CharacterReport {
            index,
            x_start: c.get_int("x_start").unwrap_or(0),
            x_end: c.get_int("x_end").unwrap_or(0),
            file: files.get(index).cloned(),
        })
        .collect();

    Report {
        image: image.to_path_buf(),
        angle,
        splits,
        characters,
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(&args);

    let config = load_config(&args)?;
    let light_ink = config.output_polarity == InkPolarity::LightInk;

    info!("Loading image: {}", args.image_path.display());
    let img = ImageReader::open(&args.image_path)
        .with_context(|| format!("Failed to open {}", args.image_path.display()))?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    info!("Image loaded: {}x{}", img.width(), img.height());

    let mut pipeline = Pipeline::new()
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(CharacterSegmentationStep::new(
            CharacterSegmenter::with_config(config),
        )));

    if let Some(size) = args.normalize_size {
        let background = if light_ink { 0 } else { 255 };
        pipeline = pipeline.add_step(Arc::new(
            NormalizeCharacterStep::new(size).with_background(background),
        ));
    }

    if let Some(debug_dir) = args.debug_out.clone() {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    let characters = pipeline.run_with_executor(img)?;

    let files = match &args.output_dir {
        Some(dir) => save_characters(dir, &characters)?,
        None => Vec::new(),
    };

    let report = build_report(&args.image_path, &characters, &files);

    println!("\n=== Character Segmentation Results ===");
    println!("Rotation angle: {:.1}°", report.angle);
    println!("Characters: {}", report.characters.len());
    for c in &report.characters {
        println!("  {:2}: columns {}..{}", c.index + 1, c.x_start, c.x_end);
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write report {}", path.display()))?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
