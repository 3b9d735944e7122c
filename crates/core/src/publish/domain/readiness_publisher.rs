use crate::pipeline::readiness_evaluator::ReadinessResult;

/// Delivers each frame's readiness signal and detection map downstream.
///
/// Called once per processed frame by the monitor loop; implementations
/// decide the transport (stdout JSON lines, in-process channel). A publish
/// failure is a loop-fatal error, not silently suppressed.
pub trait ReadinessPublisher: Send {
    fn publish(
        &mut self,
        frame_index: usize,
        result: &ReadinessResult,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
