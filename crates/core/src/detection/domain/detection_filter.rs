use crate::detection::domain::detection::RawDetection;

/// Filters raw detections by confidence and normalized area before they
/// reach the track assigner.
///
/// Both gates are STRICT inequalities: a detection whose confidence or
/// normalized area lands exactly on its threshold is discarded. Downstream
/// consumers depend on this boundary behavior; do not relax it to `>=`.
///
/// Order-preserving; an empty result is the valid "nothing found" case.
pub fn filter_detections(
    detections: &[RawDetection],
    confidence_threshold: f64,
    min_area_ratio: f64,
    frame_area: f64,
) -> Vec<RawDetection> {
    detections
        .iter()
        .filter(|d| {
            d.confidence > confidence_threshold
                && d.bbox.normalized_area(frame_area) > min_area_ratio
        })
        .copied()
        .collect()
}
