use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::pipeline::readiness_evaluator::{LabeledFace, ReadinessResult};
use crate::publish::domain::readiness_publisher::ReadinessPublisher;

/// One frame's readiness output as delivered to in-process consumers.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadinessSignal {
    pub frame: usize,
    pub ready: bool,
    pub faces: Vec<LabeledFace>,
}

/// Publishes readiness signals over a bounded crossbeam channel.
///
/// The monitor loop must never block on a slow consumer: when the channel
/// is full, the oldest pending signal is dropped so the consumer always
/// sees the freshest state.
pub struct ChannelPublisher {
    tx: Sender<ReadinessSignal>,
    // Held so the publisher can evict stale signals from a full channel
    rx: Receiver<ReadinessSignal>,
}

impl ChannelPublisher {
    /// Creates a publisher and the consumer end of its channel.
    pub fn new(capacity: usize) -> (Self, Receiver<ReadinessSignal>) {
        let (tx, rx) = bounded(capacity.max(1));
        (
            Self {
                tx,
                rx: rx.clone(),
            },
            rx,
        )
    }
}

impl ReadinessPublisher for ChannelPublisher {
    fn publish(
        &mut self,
        frame_index: usize,
        result: &ReadinessResult,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut signal = ReadinessSignal {
            frame: frame_index,
            ready: result.ready,
            faces: result.faces.clone(),
        };

        loop {
            match self.tx.try_send(signal) {
                Ok(()) => return Ok(()),
                Err(TrySendError::Full(returned)) => {
                    let _ = self.rx.try_recv();
                    signal = returned;
                }
                Err(TrySendError::Disconnected(_)) => {
                    return Err("readiness channel disconnected".into());
                }
            }
        }
    }
}
