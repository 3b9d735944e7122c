use crate::detection::domain::detection::{RawDetection, TrackedDetection};

/// Domain interface for detection-to-track association.
///
/// Contract:
/// - `update` must be called exactly once per frame, in frame arrival
///   order. Skipping a frame breaks the lost-track grace countdown;
///   reordering corrupts identity assignment.
/// - Every call mutates internal per-track state, so calling twice with
///   the same input is not idempotent.
/// - Not thread-safe; only the frame loop thread may touch it.
///
/// The returned detections are the input detections that matched a track,
/// augmented with that track's identity, in input order. Unmatched
/// low-confidence detections are dropped; unmatched high-confidence
/// detections spawn fresh identities.
pub trait TrackAssigner: Send {
    fn update(&mut self, detections: &[RawDetection]) -> Vec<TrackedDetection>;
}
