use crate::detection::domain::detection::RawDetection;
use crate::shared::frame::Frame;

/// Domain interface for per-frame face detection.
///
/// Implementations may hold inference state (a loaded model session),
/// hence `&mut self`. Detections come back in model output order with
/// no identity attached; identity is the track assigner's job.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<RawDetection>, Box<dyn std::error::Error>>;
}
