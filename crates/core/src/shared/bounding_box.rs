use serde::{Serialize, Serializer};

/// An axis-aligned box in pixel coordinates, `(x1, y1)` top-left and
/// `(x2, y2)` bottom-right.
///
/// Coordinates are kept as the detector produced them; downstream consumers
/// receive them untransformed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Absolute area in square pixels.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Area as a fraction of the total frame area.
    pub fn normalized_area(&self, frame_area: f64) -> f64 {
        self.area() / frame_area
    }

    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);

        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }

    /// Wire representation: `[x1, y1, x2, y2]`.
    pub fn as_array(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_array())
    }
}
