use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::pipeline::frame_processor::FrameProcessor;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::publish::domain::readiness_publisher::ReadinessPublisher;
use crate::video::domain::frame_source::{FrameSource, FrameSourceError};

/// Runs the cooperative frame loop: acquire → process → publish →
/// sleep-to-rate.
///
/// Single-threaded and synchronous; the processor's assigner state is only
/// ever touched here. Cancellation is checked between iterations, never
/// mid-frame. [`FrameSourceError::FrameUnavailable`] ends the loop
/// normally (stream drained or camera gone); every other error propagates
/// unretried.
pub struct MonitorFacesUseCase {
    source: Box<dyn FrameSource>,
    processor: FrameProcessor,
    publisher: Box<dyn ReadinessPublisher>,
    logger: Box<dyn PipelineLogger>,
    rate_hz: f64,
    cancelled: Arc<AtomicBool>,
}

impl MonitorFacesUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        processor: FrameProcessor,
        publisher: Box<dyn ReadinessPublisher>,
        logger: Box<dyn PipelineLogger>,
        rate_hz: f64,
        cancelled: Arc<AtomicBool>,
    ) -> Self {
        Self {
            source,
            processor,
            publisher,
            logger,
            rate_hz,
            cancelled,
        }
    }

    /// Processes frames until the source is drained or the loop is
    /// cancelled. Returns the number of frames processed.
    pub fn execute(&mut self) -> Result<usize, Box<dyn std::error::Error>> {
        let period = if self.rate_hz > 0.0 {
            Some(Duration::from_secs_f64(1.0 / self.rate_hz))
        } else {
            None
        };

        let mut frames = 0usize;
        let mut last_ready = false;

        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                self.logger.info("Monitor loop cancelled");
                break;
            }
            let iteration_start = Instant::now();

            let frame = match self.source.next_frame() {
                Ok(frame) => frame,
                Err(FrameSourceError::FrameUnavailable) => break,
                Err(e) => return Err(Box::new(e)),
            };

            let process_start = Instant::now();
            let result = self.processor.process_frame(&frame)?;
            self.logger
                .timing("process", process_start.elapsed().as_secs_f64() * 1000.0);
            self.logger.metric("faces", result.faces.len() as f64);

            if result.ready != last_ready {
                self.logger.info(&format!(
                    "Interaction readiness changed to {} at frame {}",
                    result.ready,
                    frame.index()
                ));
                last_ready = result.ready;
            }

            self.publisher.publish(frame.index(), &result)?;
            frames += 1;
            self.logger.progress(frames);

            if let Some(period) = period {
                let elapsed = iteration_start.elapsed();
                if elapsed < period {
                    thread::sleep(period - elapsed);
                }
            }
        }

        self.source.close();
        self.logger.summary();
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    use crate::detection::domain::detection::{RawDetection, TrackedDetection};
    use crate::detection::domain::face_detector::FaceDetector;
    use crate::detection::domain::track_assigner::TrackAssigner;
    use crate::pipeline::frame_processor::ProcessorConfig;
    use crate::pipeline::pipeline_logger::NullPipelineLogger;
    use crate::pipeline::readiness_evaluator::ReadinessResult;
    use crate::shared::bounding_box::BoundingBox;
    use crate::shared::frame::Frame;
    use crate::shared::stream_info::StreamInfo;

    // --- Stubs ---

    struct StubSource {
        frames_left: usize,
        next_index: usize,
        width: u32,
        height: u32,
    }

    impl StubSource {
        fn with_frames(count: usize) -> Self {
            Self {
                frames_left: count,
                next_index: 0,
                width: 672,
                height: 376,
            }
        }
    }

    impl FrameSource for StubSource {
        fn open(&mut self, _path: &Path) -> Result<StreamInfo, FrameSourceError> {
            Ok(StreamInfo {
                width: self.width,
                height: self.height,
                fps: 60.0,
            })
        }

        fn next_frame(&mut self) -> Result<Frame, FrameSourceError> {
            if self.frames_left == 0 {
                return Err(FrameSourceError::FrameUnavailable);
            }
            self.frames_left -= 1;
            let index = self.next_index;
            self.next_index += 1;
            Ok(Frame::new(
                vec![0u8; (self.width * self.height * 3) as usize],
                self.width,
                self.height,
                index,
            ))
        }

        fn close(&mut self) {}
    }

    struct StubDetector {
        per_frame: Vec<RawDetection>,
    }

    impl FaceDetector for StubDetector {
        fn detect(
            &mut self,
            _frame: &Frame,
        ) -> Result<Vec<RawDetection>, Box<dyn std::error::Error>> {
            Ok(self.per_frame.clone())
        }
    }

    struct PassthroughAssigner;

    impl TrackAssigner for PassthroughAssigner {
        fn update(&mut self, detections: &[RawDetection]) -> Vec<TrackedDetection> {
            detections
                .iter()
                .enumerate()
                .map(|(i, d)| TrackedDetection {
                    bbox: d.bbox,
                    confidence: d.confidence,
                    track_id: i as u32 + 1,
                })
                .collect()
        }
    }

    struct RecordingPublisher {
        published: Arc<Mutex<Vec<(usize, ReadinessResult)>>>,
    }

    impl ReadinessPublisher for RecordingPublisher {
        fn publish(
            &mut self,
            frame_index: usize,
            result: &ReadinessResult,
        ) -> Result<(), Box<dyn std::error::Error>> {
            self.published
                .lock()
                .unwrap()
                .push((frame_index, result.clone()));
            Ok(())
        }
    }

    struct FailingPublisher;

    impl ReadinessPublisher for FailingPublisher {
        fn publish(
            &mut self,
            _frame_index: usize,
            _result: &ReadinessResult,
        ) -> Result<(), Box<dyn std::error::Error>> {
            Err("transport down".into())
        }
    }

    // --- Helpers ---

    fn processor_with(per_frame: Vec<RawDetection>) -> FrameProcessor {
        FrameProcessor::new(
            Box::new(StubDetector { per_frame }),
            Box::new(PassthroughAssigner),
            ProcessorConfig::default(),
        )
        .unwrap()
    }

    fn use_case(
        source: StubSource,
        processor: FrameProcessor,
        publisher: Box<dyn ReadinessPublisher>,
        cancelled: Arc<AtomicBool>,
    ) -> MonitorFacesUseCase {
        MonitorFacesUseCase::new(
            Box::new(source),
            processor,
            publisher,
            Box::new(NullPipelineLogger),
            0.0, // uncapped in tests
            cancelled,
        )
    }

    fn det(x1: f64, y1: f64, x2: f64, y2: f64, confidence: f64) -> RawDetection {
        RawDetection::new(BoundingBox::new(x1, y1, x2, y2), confidence)
    }

    // --- Tests ---

    #[test]
    fn test_processes_until_source_drained() {
        let published = Arc::new(Mutex::new(Vec::new()));
        let mut uc = use_case(
            StubSource::with_frames(5),
            processor_with(vec![]),
            Box::new(RecordingPublisher {
                published: published.clone(),
            }),
            Arc::new(AtomicBool::new(false)),
        );

        let frames = uc.execute().unwrap();
        assert_eq!(frames, 5);
        assert_eq!(published.lock().unwrap().len(), 5);
    }

    #[test]
    fn test_publishes_every_frame_with_index() {
        let published = Arc::new(Mutex::new(Vec::new()));
        let mut uc = use_case(
            StubSource::with_frames(3),
            processor_with(vec![det(100.0, 100.0, 150.0, 170.0, 0.9)]),
            Box::new(RecordingPublisher {
                published: published.clone(),
            }),
            Arc::new(AtomicBool::new(false)),
        );

        uc.execute().unwrap();

        let published = published.lock().unwrap();
        for (i, (frame_index, result)) in published.iter().enumerate() {
            assert_eq!(*frame_index, i);
            assert!(result.ready);
            assert_eq!(result.faces[0].label, "face 0");
        }
    }

    #[test]
    fn test_empty_frames_publish_not_ready() {
        let published = Arc::new(Mutex::new(Vec::new()));
        let mut uc = use_case(
            StubSource::with_frames(2),
            processor_with(vec![]),
            Box::new(RecordingPublisher {
                published: published.clone(),
            }),
            Arc::new(AtomicBool::new(false)),
        );

        uc.execute().unwrap();

        for (_, result) in published.lock().unwrap().iter() {
            assert_eq!(*result, ReadinessResult::not_ready());
        }
    }

    #[test]
    fn test_cancellation_before_first_frame() {
        let published = Arc::new(Mutex::new(Vec::new()));
        let mut uc = use_case(
            StubSource::with_frames(100),
            processor_with(vec![]),
            Box::new(RecordingPublisher {
                published: published.clone(),
            }),
            Arc::new(AtomicBool::new(true)),
        );

        let frames = uc.execute().unwrap();
        assert_eq!(frames, 0);
        assert!(published.lock().unwrap().is_empty());
    }

    #[test]
    fn test_publisher_error_propagates() {
        let mut uc = use_case(
            StubSource::with_frames(3),
            processor_with(vec![]),
            Box::new(FailingPublisher),
            Arc::new(AtomicBool::new(false)),
        );

        assert!(uc.execute().is_err());
    }

    #[test]
    fn test_empty_source_completes_with_zero_frames() {
        let mut uc = use_case(
            StubSource::with_frames(0),
            processor_with(vec![]),
            Box::new(RecordingPublisher {
                published: Arc::new(Mutex::new(Vec::new())),
            }),
            Arc::new(AtomicBool::new(false)),
        );

        assert_eq!(uc.execute().unwrap(), 0);
    }

    #[test]
    fn test_rate_cap_slows_loop() {
        // 2 frames at 100 Hz: at least one inter-frame sleep of ~10ms
        let mut uc = MonitorFacesUseCase::new(
            Box::new(StubSource::with_frames(2)),
            processor_with(vec![]),
            Box::new(RecordingPublisher {
                published: Arc::new(Mutex::new(Vec::new())),
            }),
            Box::new(NullPipelineLogger),
            100.0,
            Arc::new(AtomicBool::new(false)),
        );

        let start = Instant::now();
        uc.execute().unwrap();
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
