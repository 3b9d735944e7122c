use crate::shared::bounding_box::BoundingBox;

/// A candidate face straight from the detector: bounding box plus
/// confidence in `[0, 1]`. Lives for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawDetection {
    pub bbox: BoundingBox,
    pub confidence: f64,
}

impl RawDetection {
    pub fn new(bbox: BoundingBox, confidence: f64) -> Self {
        Self { bbox, confidence }
    }
}

/// A detection augmented with a persistent identity by the track assigner.
///
/// `track_id` is stable across frames for as long as the assigner keeps
/// matching the same physical face; it is never reassigned to another face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedDetection {
    pub bbox: BoundingBox,
    pub confidence: f64,
    pub track_id: u32,
}
