use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;

use facesense_core::detection::domain::face_detector::FaceDetector;
use facesense_core::detection::domain::model_variant::ModelVariant;
use facesense_core::detection::infrastructure::bytetrack_assigner::ByteTrackAssigner;
use facesense_core::detection::infrastructure::onnx_face_detector::{
    OnnxFaceDetector, CANDIDATE_FLOOR,
};
use facesense_core::pipeline::frame_processor::{FrameProcessor, ProcessorConfig};
use facesense_core::pipeline::monitor_faces_use_case::MonitorFacesUseCase;
use facesense_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facesense_core::pipeline::readiness_evaluator::ReadinessPolicy;
use facesense_core::publish::infrastructure::json_line_publisher::JsonLinePublisher;
use facesense_core::shared::constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_LOOP_RATE_HZ, DEFAULT_MIN_AREA_RATIO,
    DEFAULT_READY_AREA, TRACKER_MAX_LOST,
};
use facesense_core::shared::model_resolver;
use facesense_core::shared::stream_info::StreamInfo;
use facesense_core::video::domain::frame_source::FrameSource;
use facesense_core::video::infrastructure::ffmpeg_source::FfmpegSource;

/// Face detection and interaction-readiness monitoring for a camera stream.
#[derive(Parser)]
#[command(name = "facesense")]
struct Cli {
    /// Input video file or camera device (e.g. /dev/video0).
    input: PathBuf,

    /// YOLO face model size: n, s, m, l, or x.
    #[arg(long, default_value = "n")]
    model_size: String,

    /// Detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE_THRESHOLD)]
    confidence: f64,

    /// Minimum bounding-box area as a fraction of the frame area.
    #[arg(long, default_value_t = DEFAULT_MIN_AREA_RATIO)]
    min_area_ratio: f64,

    /// Absolute bounding-box area (px²) above which a face is ready to interact.
    #[arg(long, default_value_t = DEFAULT_READY_AREA)]
    ready_area: f64,

    /// Loop frequency cap in Hz (0 = uncapped).
    #[arg(long, default_value_t = DEFAULT_LOOP_RATE_HZ)]
    rate: f64,

    /// Frames a track survives without a matching detection.
    #[arg(long, default_value_t = TRACKER_MAX_LOST)]
    max_lost: usize,

    /// Reproduce the legacy readiness signal (last detection wins).
    #[arg(long)]
    legacy_ready: bool,

    /// Attempts to open the input before giving up.
    #[arg(long, default_value = "5")]
    open_attempts: usize,

    /// Delay between open attempts in seconds.
    #[arg(long, default_value = "2")]
    open_retry_secs: u64,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let variant = parse_model_size(&cli.model_size)?;
    let detector = build_detector(variant)?;
    let assigner = Box::new(ByteTrackAssigner::new(cli.max_lost));

    let (source, info) = open_source_with_retry(
        &cli.input,
        cli.open_attempts,
        Duration::from_secs(cli.open_retry_secs),
    )?;
    log::info!(
        "Input stream: {}x{} at {:.1} fps",
        info.width,
        info.height,
        info.fps
    );

    let config = ProcessorConfig {
        confidence_threshold: cli.confidence,
        min_area_ratio: cli.min_area_ratio,
        ready_area: cli.ready_area,
        frame_width: info.width,
        frame_height: info.height,
        policy: if cli.legacy_ready {
            ReadinessPolicy::LastFace
        } else {
            ReadinessPolicy::AnyFace
        },
    };
    let processor = FrameProcessor::new(detector, assigner, config)?;

    let mut use_case = MonitorFacesUseCase::new(
        source,
        processor,
        Box::new(JsonLinePublisher::new(io::stdout())),
        Box::new(StdoutPipelineLogger::default()),
        cli.rate,
        Arc::new(AtomicBool::new(false)),
    );

    let frames = use_case.execute()?;
    log::info!("Stream ended after {frames} frames");
    Ok(())
}

fn build_detector(variant: ModelVariant) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {}", variant.file_name());
    let model_path = model_resolver::resolve(
        variant.file_name(),
        &variant.url(),
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    Ok(Box::new(OnnxFaceDetector::new(&model_path, CANDIDATE_FLOOR)?))
}

fn open_source_with_retry(
    input: &Path,
    attempts: usize,
    delay: Duration,
) -> Result<(Box<dyn FrameSource>, StreamInfo), Box<dyn std::error::Error>> {
    let mut source = FfmpegSource::new();

    for attempt in 1..attempts {
        match source.open(input) {
            Ok(info) => {
                log::info!("Opened {} on attempt {attempt}", input.display());
                return Ok((Box::new(source), info));
            }
            Err(e) => {
                log::warn!(
                    "Attempt {attempt}/{attempts} failed to open {}: {e}. Retrying in {}s...",
                    input.display(),
                    delay.as_secs()
                );
                thread::sleep(delay);
            }
        }
    }

    let info = source.open(input).map_err(|e| {
        format!(
            "Failed to open {} after {attempts} attempts: {e}",
            input.display()
        )
    })?;
    log::info!("Opened {} on attempt {attempts}", input.display());
    Ok((Box::new(source), info))
}

fn parse_model_size(tag: &str) -> Result<ModelVariant, Box<dyn std::error::Error>> {
    ModelVariant::parse(tag)
        .ok_or_else(|| format!("Model size must be one of: n, s, m, l, x, got '{tag}'").into())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    if cli.min_area_ratio <= 0.0 || cli.min_area_ratio >= 1.0 {
        return Err(format!(
            "Min area ratio must be strictly between 0.0 and 1.0, got {}",
            cli.min_area_ratio
        )
        .into());
    }
    if cli.ready_area < 0.0 {
        return Err(format!("Ready area must be non-negative, got {}", cli.ready_area).into());
    }
    if cli.rate < 0.0 {
        return Err(format!("Rate must be non-negative, got {}", cli.rate).into());
    }
    if cli.open_attempts == 0 {
        return Err("Open attempts must be at least 1".into());
    }
    parse_model_size(&cli.model_size)?;
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
