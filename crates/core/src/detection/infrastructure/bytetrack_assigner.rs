/// Simplified ByteTrack detection-to-track assigner.
///
/// Two-stage association: high-confidence detections are matched to
/// existing tracks first, then low-confidence detections fill remaining
/// unmatched tracks. Weak detections can keep an existing track alive
/// through a momentary confidence drop but never start a new one.
use std::collections::HashSet;

use crate::detection::domain::detection::{RawDetection, TrackedDetection};
use crate::detection::domain::track_assigner::TrackAssigner;
use crate::shared::bounding_box::BoundingBox;

const HIGH_THRESH: f64 = 0.5;
const MATCH_THRESH: f64 = 0.3;

#[derive(Clone, Debug)]
struct TrackState {
    id: u32,
    bbox: BoundingBox,
    frames_lost: usize,
    det_index: Option<usize>,
}

pub struct ByteTrackAssigner {
    tracks: Vec<TrackState>,
    next_id: u32,
    max_lost: usize,
}

impl ByteTrackAssigner {
    pub fn new(max_lost: usize) -> Self {
        Self {
            tracks: Vec::new(),
            next_id: 1,
            max_lost,
        }
    }

    fn clear_frame_state(&mut self) {
        for track in &mut self.tracks {
            track.det_index = None;
        }
    }

    fn match_high_confidence(
        &mut self,
        high: &[(usize, &RawDetection)],
        detections: &[RawDetection],
    ) -> HashSet<usize> {
        let candidates: Vec<(usize, BoundingBox)> = self
            .tracks
            .iter()
            .enumerate()
            .map(|(i, t)| (i, t.bbox))
            .collect();

        let mut matched_det_indices = HashSet::new();
        for (ti, di) in greedy_match(&candidates, high, MATCH_THRESH) {
            self.apply_match(ti, di, detections[di].bbox);
            matched_det_indices.insert(di);
        }
        matched_det_indices
    }

    fn match_low_confidence(&mut self, low: &[(usize, &RawDetection)], detections: &[RawDetection]) {
        let unmatched: Vec<(usize, BoundingBox)> = self
            .tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.det_index.is_none())
            .map(|(i, t)| (i, t.bbox))
            .collect();

        for (ti, di) in greedy_match(&unmatched, low, MATCH_THRESH) {
            self.apply_match(ti, di, detections[di].bbox);
        }
    }

    fn apply_match(&mut self, track_idx: usize, det_idx: usize, bbox: BoundingBox) {
        let track = &mut self.tracks[track_idx];
        track.bbox = bbox;
        track.frames_lost = 0;
        track.det_index = Some(det_idx);
    }

    fn spawn_new_tracks(
        &mut self,
        high: &[(usize, &RawDetection)],
        matched: &HashSet<usize>,
        detections: &[RawDetection],
    ) {
        for (di, _) in high {
            if !matched.contains(di) {
                self.tracks.push(TrackState {
                    id: self.next_id,
                    bbox: detections[*di].bbox,
                    frames_lost: 0,
                    det_index: Some(*di),
                });
                self.next_id += 1;
            }
        }
    }

    fn age_unmatched_tracks(&mut self, num_existing: usize) {
        for track in self.tracks.iter_mut().take(num_existing) {
            if track.det_index.is_none() {
                track.frames_lost += 1;
            }
        }
        let max_lost = self.max_lost;
        self.tracks.retain(|t| t.frames_lost <= max_lost);
    }

    /// Input detections that found a track this frame, augmented with the
    /// track's identity, in input order. Lost tracks stay internal for
    /// re-identification and produce no output.
    fn assigned_detections(&self, detections: &[RawDetection]) -> Vec<TrackedDetection> {
        let mut pairs: Vec<(usize, u32)> = self
            .tracks
            .iter()
            .filter_map(|t| t.det_index.map(|di| (di, t.id)))
            .collect();
        pairs.sort_by_key(|&(di, _)| di);

        pairs
            .into_iter()
            .map(|(di, id)| TrackedDetection {
                bbox: detections[di].bbox,
                confidence: detections[di].confidence,
                track_id: id,
            })
            .collect()
    }
}

impl TrackAssigner for ByteTrackAssigner {
    fn update(&mut self, detections: &[RawDetection]) -> Vec<TrackedDetection> {
        let (high, low) = split_by_confidence(detections);

        self.clear_frame_state();
        let num_existing = self.tracks.len();
        let matched_high = self.match_high_confidence(&high, detections);
        self.match_low_confidence(&low, detections);
        self.spawn_new_tracks(&high, &matched_high, detections);
        self.age_unmatched_tracks(num_existing);

        self.assigned_detections(detections)
    }
}

type IndexedDets<'a> = Vec<(usize, &'a RawDetection)>;

fn split_by_confidence(detections: &[RawDetection]) -> (IndexedDets<'_>, IndexedDets<'_>) {
    let mut high = Vec::new();
    let mut low = Vec::new();
    for (i, det) in detections.iter().enumerate() {
        if det.confidence >= HIGH_THRESH {
            high.push((i, det));
        } else {
            low.push((i, det));
        }
    }
    (high, low)
}

/// Greedy IoU matching: pairs sorted by descending IoU, each track and
/// detection used at most once.
fn greedy_match(
    tracks: &[(usize, BoundingBox)],
    dets: &[(usize, &RawDetection)],
    thresh: f64,
) -> Vec<(usize, usize)> {
    let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
    for (ti, bbox) in tracks {
        for (di, det) in dets {
            let score = bbox.iou(&det.bbox);
            if score >= thresh {
                pairs.push((*ti, *di, score));
            }
        }
    }
    pairs.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    let mut used_tracks = HashSet::new();
    let mut used_dets = HashSet::new();
    let mut matches = Vec::new();

    for (ti, di, _) in &pairs {
        if !used_tracks.contains(ti) && !used_dets.contains(di) {
            used_tracks.insert(*ti);
            used_dets.insert(*di);
            matches.push((*ti, *di));
        }
    }
    matches
}
