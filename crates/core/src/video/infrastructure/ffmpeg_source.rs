use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;
use crate::video::domain::frame_source::{FrameSource, FrameSourceError};

/// Decodes frames via ffmpeg-next (libavformat + libavcodec).
///
/// Each decoded frame is converted to RGB24 and wrapped in a [`Frame`]
/// with a sequential index. End of stream surfaces as
/// [`FrameSourceError::FrameUnavailable`].
pub struct FfmpegSource {
    input_ctx: Option<ffmpeg_next::format::context::Input>,
    decoder: Option<ffmpeg_next::decoder::Video>,
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    video_stream_index: usize,
    width: u32,
    height: u32,
    frame_index: usize,
    flushing: bool,
}

// Safety: FfmpegSource is only used from the single loop thread.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegSource {}

impl FfmpegSource {
    pub fn new() -> Self {
        Self {
            input_ctx: None,
            decoder: None,
            scaler: None,
            video_stream_index: 0,
            width: 0,
            height: 0,
            frame_index: 0,
            flushing: false,
        }
    }

    /// Pulls one decoded frame out of the decoder, if it has one ready.
    fn try_receive(&mut self) -> Result<Option<Frame>, FrameSourceError> {
        let decoder = self.decoder.as_mut().ok_or(FrameSourceError::NotOpened)?;
        let scaler = self.scaler.as_mut().ok_or(FrameSourceError::NotOpened)?;

        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        scaler.run(&decoded, &mut rgb_frame)?;

        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        let frame = Frame::new(pixels, self.width, self.height, self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }
}

impl Default for FfmpegSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for FfmpegSource {
    fn open(&mut self, path: &Path) -> Result<StreamInfo, FrameSourceError> {
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(path)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or(FrameSourceError::NoVideoStream)?;

        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let rate = stream.rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };

        let width = decoder.width();
        let height = decoder.height();

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        self.video_stream_index = video_stream_index;
        self.width = width;
        self.height = height;
        self.frame_index = 0;
        self.flushing = false;
        self.decoder = Some(decoder);
        self.scaler = Some(scaler);
        self.input_ctx = Some(ictx);

        Ok(StreamInfo { width, height, fps })
    }

    fn next_frame(&mut self) -> Result<Frame, FrameSourceError> {
        if self.input_ctx.is_none() {
            return Err(FrameSourceError::NotOpened);
        }

        loop {
            if let Some(frame) = self.try_receive()? {
                return Ok(frame);
            }
            if self.flushing {
                return Err(FrameSourceError::FrameUnavailable);
            }

            // Feed packets until the decoder yields a frame or the input
            // runs dry
            let video_stream_index = self.video_stream_index;
            loop {
                let packet = {
                    let ictx = self.input_ctx.as_mut().ok_or(FrameSourceError::NotOpened)?;
                    ictx.packets()
                        .find(|(stream, _)| stream.index() == video_stream_index)
                        .map(|(_, packet)| packet)
                };

                let Some(packet) = packet else {
                    let decoder = self.decoder.as_mut().ok_or(FrameSourceError::NotOpened)?;
                    let _ = decoder.send_eof();
                    self.flushing = true;
                    break;
                };

                let decoder = self.decoder.as_mut().ok_or(FrameSourceError::NotOpened)?;
                if decoder.send_packet(&packet).is_ok() {
                    break;
                }
            }
        }
    }

    fn close(&mut self) {
        self.input_ctx = None;
        self.decoder = None;
        self.scaler = None;
        self.flushing = false;
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer.
///
/// ffmpeg frames may have padding bytes at the end of each row
/// (stride > width*3); this strips that padding.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
