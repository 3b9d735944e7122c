use thiserror::Error;

use crate::detection::domain::detection_filter::filter_detections;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::track_assigner::TrackAssigner;
use crate::pipeline::readiness_evaluator::{evaluate, ReadinessPolicy, ReadinessResult};
use crate::shared::constants::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH,
    DEFAULT_MIN_AREA_RATIO, DEFAULT_READY_AREA,
};
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("confidence threshold must be in [0, 1], got {0}")]
    ConfidenceOutOfRange(f64),
    #[error("min area ratio must be in (0, 1), got {0}")]
    AreaRatioOutOfRange(f64),
    #[error("ready area must be non-negative, got {0}")]
    ReadyAreaNegative(f64),
    #[error("frame dimensions must be non-zero, got {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },
}

/// Session-fixed thresholds and frame geometry. Two independent area knobs
/// on purpose: `min_area_ratio` gates normalized area at the filter stage,
/// `ready_area` gates absolute pixel area at the readiness stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessorConfig {
    pub confidence_threshold: f64,
    pub min_area_ratio: f64,
    pub ready_area: f64,
    pub frame_width: u32,
    pub frame_height: u32,
    pub policy: ReadinessPolicy,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            min_area_ratio: DEFAULT_MIN_AREA_RATIO,
            ready_area: DEFAULT_READY_AREA,
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            policy: ReadinessPolicy::AnyFace,
        }
    }
}

impl ProcessorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::ConfidenceOutOfRange(self.confidence_threshold));
        }
        if self.min_area_ratio <= 0.0 || self.min_area_ratio >= 1.0 {
            return Err(ConfigError::AreaRatioOutOfRange(self.min_area_ratio));
        }
        if self.ready_area < 0.0 {
            return Err(ConfigError::ReadyAreaNegative(self.ready_area));
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::EmptyFrame {
                width: self.frame_width,
                height: self.frame_height,
            });
        }
        Ok(())
    }

    pub fn frame_area(&self) -> f64 {
        self.frame_width as f64 * self.frame_height as f64
    }
}

/// Composes one frame's pass through the pipeline:
/// detect → filter → assign identities → evaluate readiness.
///
/// Owns the detector and assigner (dependency-injected, never ambient) so
/// independent processors can coexist in tests and embedders.
pub struct FrameProcessor {
    detector: Box<dyn FaceDetector>,
    assigner: Box<dyn TrackAssigner>,
    config: ProcessorConfig,
}

impl FrameProcessor {
    pub fn new(
        detector: Box<dyn FaceDetector>,
        assigner: Box<dyn TrackAssigner>,
        config: ProcessorConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            detector,
            assigner,
            config,
        })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Processes a single frame. Must be called once per frame in arrival
    /// order: the assigner is updated even when the filtered set is empty,
    /// so lost-track grace periods keep counting down.
    pub fn process_frame(
        &mut self,
        frame: &Frame,
    ) -> Result<ReadinessResult, Box<dyn std::error::Error>> {
        let raw = self.detector.detect(frame)?;
        let filtered = filter_detections(
            &raw,
            self.config.confidence_threshold,
            self.config.min_area_ratio,
            self.config.frame_area(),
        );
        let tracked = self.assigner.update(&filtered);

        log::debug!(
            "frame {}: {} raw, {} filtered, {} tracked",
            frame.index(),
            raw.len(),
            filtered.len(),
            tracked.len()
        );

        Ok(evaluate(&tracked, self.config.ready_area, self.config.policy))
    }
}
