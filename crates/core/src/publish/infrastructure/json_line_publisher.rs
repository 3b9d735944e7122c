use std::io::Write;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::pipeline::readiness_evaluator::{LabeledFace, ReadinessResult};
use crate::publish::domain::readiness_publisher::ReadinessPublisher;

/// Writes one JSON object per frame to the wrapped writer:
///
/// `{"frame": 7, "ready": true, "detections": {"face 0": [x1,y1,x2,y2]}}`
///
/// Detection map keys keep detection order.
pub struct JsonLinePublisher<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> JsonLinePublisher<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> ReadinessPublisher for JsonLinePublisher<W> {
    fn publish(
        &mut self,
        frame_index: usize,
        result: &ReadinessResult,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let payload = FramePayload {
            frame: frame_index,
            ready: result.ready,
            detections: DetectionMap(&result.faces),
        };
        serde_json::to_writer(&mut self.out, &payload)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct FramePayload<'a> {
    frame: usize,
    ready: bool,
    detections: DetectionMap<'a>,
}

/// Serializes labeled faces as a JSON object in label order.
struct DetectionMap<'a>(&'a [LabeledFace]);

impl Serialize for DetectionMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for face in self.0 {
            map.serialize_entry(&face.label, &face.bbox)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::bounding_box::BoundingBox;

    fn result_with(faces: Vec<(&str, [f64; 4])>, ready: bool) -> ReadinessResult {
        ReadinessResult {
            ready,
            faces: faces
                .into_iter()
                .map(|(label, b)| LabeledFace {
                    label: label.to_string(),
                    bbox: BoundingBox::new(b[0], b[1], b[2], b[3]),
                })
                .collect(),
        }
    }

    fn publish_to_string(frame: usize, result: &ReadinessResult) -> String {
        let mut publisher = JsonLinePublisher::new(Vec::new());
        publisher.publish(frame, result).unwrap();
        String::from_utf8(publisher.out).unwrap()
    }

    #[test]
    fn test_empty_result() {
        let line = publish_to_string(0, &ReadinessResult::not_ready());
        assert_eq!(line, "{\"frame\":0,\"ready\":false,\"detections\":{}}\n");
    }

    #[test]
    fn test_single_face_payload() {
        let result = result_with(vec![("face 0", [100.0, 100.0, 150.0, 170.0])], true);
        let line = publish_to_string(3, &result);
        assert_eq!(
            line,
            "{\"frame\":3,\"ready\":true,\"detections\":{\"face 0\":[100.0,100.0,150.0,170.0]}}\n"
        );
    }

    #[test]
    fn test_map_keys_keep_detection_order() {
        let result = result_with(
            vec![
                ("face 0", [0.0, 0.0, 10.0, 10.0]),
                ("face 1", [20.0, 0.0, 30.0, 10.0]),
                ("face 2", [40.0, 0.0, 50.0, 10.0]),
            ],
            false,
        );
        let line = publish_to_string(0, &result);

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        let keys: Vec<&String> = parsed["detections"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["face 0", "face 1", "face 2"]);
    }

    #[test]
    fn test_one_line_per_publish() {
        let mut publisher = JsonLinePublisher::new(Vec::new());
        publisher.publish(0, &ReadinessResult::not_ready()).unwrap();
        publisher.publish(1, &ReadinessResult::not_ready()).unwrap();

        let text = String::from_utf8(publisher.out).unwrap();
        assert_eq!(text.lines().count(), 2);
        for line in text.lines() {
            assert!(serde_json::from_str::<serde_json::Value>(line).is_ok());
        }
    }

    #[test]
    fn test_coordinates_untransformed() {
        let result = result_with(vec![("face 0", [1.5, 2.25, 31.75, 42.5])], false);
        let line = publish_to_string(0, &result);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        let coords: Vec<f64> = parsed["detections"]["face 0"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect();
        assert_eq!(coords, vec![1.5, 2.25, 31.75, 42.5]);
    }
}
