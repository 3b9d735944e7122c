use crate::detection::domain::detection::TrackedDetection;
use crate::shared::bounding_box::BoundingBox;

/// How per-detection area checks combine into the frame's readiness signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadinessPolicy {
    /// Ready if ANY detection's absolute area exceeds the threshold.
    #[default]
    AnyFace,
    /// Ready if the LAST detection's absolute area exceeds the threshold.
    ///
    /// Compatibility mode for consumers tuned to the legacy node, which
    /// re-published the signal per detection so only the final one stuck.
    LastFace,
}

/// A detection's bounding box under its positional per-frame label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledFace {
    pub label: String,
    pub bbox: BoundingBox,
}

/// Per-frame output of the readiness evaluator. Recomputed every frame;
/// holds no cross-frame state.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadinessResult {
    pub ready: bool,
    pub faces: Vec<LabeledFace>,
}

impl ReadinessResult {
    /// The "nothing found" result: not ready, empty map.
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            faces: Vec::new(),
        }
    }
}

/// Derives the interaction-readiness signal and the label map from one
/// frame's tracked detections.
///
/// The area gate here is ABSOLUTE pixel area against `ready_area` (strict
/// `>`), independent of the normalized-area gate the detection filter
/// already applied. Labels are positional (`"face 0"`, `"face 1"`, …) in
/// input order; every detection appears in the map whether or not it is
/// large enough to flip the signal.
pub fn evaluate(
    detections: &[TrackedDetection],
    ready_area: f64,
    policy: ReadinessPolicy,
) -> ReadinessResult {
    let mut ready = false;
    let mut faces = Vec::with_capacity(detections.len());

    for (i, det) in detections.iter().enumerate() {
        faces.push(LabeledFace {
            label: format!("face {i}"),
            bbox: det.bbox,
        });

        let large_enough = det.bbox.area() > ready_area;
        match policy {
            ReadinessPolicy::AnyFace => ready = ready || large_enough,
            ReadinessPolicy::LastFace => ready = large_enough,
        }
    }

    ReadinessResult { ready, faces }
}

#[cfg(test)]
mod tests {
    use super::*;

    const READY_AREA: f64 = 2500.0;

    fn tracked(x1: f64, y1: f64, x2: f64, y2: f64, track_id: u32) -> TrackedDetection {
        TrackedDetection {
            bbox: BoundingBox::new(x1, y1, x2, y2),
            confidence: 0.9,
            track_id,
        }
    }

    #[test]
    fn test_no_detections_not_ready_empty_map() {
        let result = evaluate(&[], READY_AREA, ReadinessPolicy::AnyFace);
        assert_eq!(result, ReadinessResult::not_ready());
    }

    #[test]
    fn test_single_large_face_is_ready() {
        // 50x70 box → area 3500 > 2500
        let result = evaluate(
            &[tracked(100.0, 100.0, 150.0, 170.0, 1)],
            READY_AREA,
            ReadinessPolicy::AnyFace,
        );
        assert!(result.ready);
        assert_eq!(result.faces.len(), 1);
        assert_eq!(result.faces[0].label, "face 0");
        assert_eq!(result.faces[0].bbox.as_array(), [100.0, 100.0, 150.0, 170.0]);
    }

    #[test]
    fn test_single_small_face_not_ready_but_mapped() {
        // 10x10 box → area 100 < 2500; still appears in the map
        let result = evaluate(
            &[tracked(10.0, 10.0, 20.0, 20.0, 1)],
            READY_AREA,
            ReadinessPolicy::AnyFace,
        );
        assert!(!result.ready);
        assert_eq!(result.faces.len(), 1);
        assert_eq!(result.faces[0].label, "face 0");
        assert_eq!(result.faces[0].bbox.as_array(), [10.0, 10.0, 20.0, 20.0]);
    }

    #[test]
    fn test_area_exactly_at_threshold_not_ready() {
        // 50x50 box → area exactly 2500; strict gate excludes it
        let result = evaluate(
            &[tracked(0.0, 0.0, 50.0, 50.0, 1)],
            READY_AREA,
            ReadinessPolicy::AnyFace,
        );
        assert!(!result.ready);
    }

    #[test]
    fn test_any_face_first_large_second_small_is_ready() {
        let dets = [
            tracked(100.0, 100.0, 200.0, 200.0, 1), // area 10000
            tracked(10.0, 10.0, 20.0, 20.0, 2),     // area 100
        ];
        let result = evaluate(&dets, READY_AREA, ReadinessPolicy::AnyFace);
        assert!(result.ready);
    }

    #[test]
    fn test_last_face_first_large_second_small_not_ready() {
        // Regression pin for the legacy overwrite semantics: only the last
        // detection's comparison survives.
        let dets = [
            tracked(100.0, 100.0, 200.0, 200.0, 1),
            tracked(10.0, 10.0, 20.0, 20.0, 2),
        ];
        let result = evaluate(&dets, READY_AREA, ReadinessPolicy::LastFace);
        assert!(!result.ready);
    }

    #[test]
    fn test_last_face_final_detection_large_is_ready() {
        let dets = [
            tracked(10.0, 10.0, 20.0, 20.0, 1),
            tracked(100.0, 100.0, 200.0, 200.0, 2),
        ];
        let result = evaluate(&dets, READY_AREA, ReadinessPolicy::LastFace);
        assert!(result.ready);
    }

    #[test]
    fn test_policies_agree_on_single_detection() {
        let large = [tracked(0.0, 0.0, 60.0, 60.0, 1)];
        for policy in [ReadinessPolicy::AnyFace, ReadinessPolicy::LastFace] {
            assert!(evaluate(&large, READY_AREA, policy).ready);
        }
    }

    #[test]
    fn test_labels_positional_in_input_order() {
        let dets = [
            tracked(0.0, 0.0, 10.0, 10.0, 7),
            tracked(20.0, 0.0, 30.0, 10.0, 3),
            tracked(40.0, 0.0, 50.0, 10.0, 9),
        ];
        let result = evaluate(&dets, READY_AREA, ReadinessPolicy::AnyFace);
        let labels: Vec<&str> = result.faces.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["face 0", "face 1", "face 2"]);
    }

    #[test]
    fn test_map_reconstructible_from_input() {
        // Label order = input order, values = raw pixel coordinates
        let dets = [
            tracked(1.5, 2.5, 31.5, 42.5, 4),
            tracked(100.0, 90.0, 180.0, 170.0, 2),
        ];
        let result = evaluate(&dets, READY_AREA, ReadinessPolicy::AnyFace);
        assert_eq!(result.faces.len(), dets.len());
        for (i, det) in dets.iter().enumerate() {
            assert_eq!(result.faces[i].label, format!("face {i}"));
            assert_eq!(result.faces[i].bbox, det.bbox);
        }
    }

    #[test]
    fn test_map_contents_independent_of_policy() {
        let dets = [
            tracked(0.0, 0.0, 10.0, 10.0, 1),
            tracked(0.0, 0.0, 100.0, 100.0, 2),
        ];
        let any = evaluate(&dets, READY_AREA, ReadinessPolicy::AnyFace);
        let last = evaluate(&dets, READY_AREA, ReadinessPolicy::LastFace);
        assert_eq!(any.faces, last.faces);
    }
}
