use ndarray::ArrayView3;

/// A single RGB24 video frame: contiguous bytes in row-major order.
///
/// Frames are produced by a `FrameSource`, consumed synchronously by the
/// detector, and discarded; the core never mutates pixel data.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * 3,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Position in the stream, starting at 0.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Total pixel count, the denominator for normalized-area gating.
    pub fn pixel_area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    /// View as `(height, width, 3)` for tensor preprocessing.
    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, 3),
            &self.data,
        )
        .expect("Frame data length must match dimensions")
    }
}
