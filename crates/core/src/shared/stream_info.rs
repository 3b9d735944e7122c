/// Properties of an opened frame source.
///
/// Width and height are fixed for the lifetime of a stream; the processor
/// config derives its frame area from them.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl StreamInfo {
    pub fn pixel_area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_area() {
        let info = StreamInfo {
            width: 672,
            height: 376,
            fps: 60.0,
        };
        assert_eq!(info.pixel_area(), 252672.0);
    }

    #[test]
    fn test_camera_stream_without_known_fps() {
        // Live sources may not report a rate; fps=0 means "unknown"
        let info = StreamInfo {
            width: 1280,
            height: 720,
            fps: 0.0,
        };
        assert_eq!(info.fps, 0.0);
    }
}
