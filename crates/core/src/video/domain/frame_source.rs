use std::path::Path;

use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;

#[derive(Error, Debug)]
pub enum FrameSourceError {
    /// No frame could be acquired: the stream is drained or the camera
    /// stopped delivering. Terminates the loop iteration; retry policy
    /// belongs to the acquisition layer, not the core.
    #[error("no frame available from source")]
    FrameUnavailable,
    #[error("source not opened")]
    NotOpened,
    #[error("no video stream in input")]
    NoVideoStream,
    #[error("decode failed: {0}")]
    Decode(#[from] ffmpeg_next::Error),
}

/// Pulls frames from a camera device or video file.
///
/// Implementations handle I/O details (codec, container, device protocol)
/// while the pipeline works with the abstract `Frame` and `StreamInfo`
/// types. `next_frame` blocks for a bounded time waiting on the source.
pub trait FrameSource: Send {
    /// Opens the source and returns its stream properties.
    fn open(&mut self, path: &Path) -> Result<StreamInfo, FrameSourceError>;

    /// Returns the next frame in decode order, with a sequential index.
    fn next_frame(&mut self) -> Result<Frame, FrameSourceError>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}
