use std::fmt;

use crate::shared::constants::MODEL_RELEASE_URL;

/// YOLO face model size, resolved at startup to a concrete model asset.
///
/// A closed set rather than a free-form string so an unknown size is
/// rejected at configuration time, not at download time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModelVariant {
    #[default]
    Nano,
    Small,
    Medium,
    Large,
    XLarge,
}

impl ModelVariant {
    /// Parses the single-letter size tag used on the command line.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "n" => Some(Self::Nano),
            "s" => Some(Self::Small),
            "m" => Some(Self::Medium),
            "l" => Some(Self::Large),
            "x" => Some(Self::XLarge),
            _ => None,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Nano => "yolov8n-face.onnx",
            Self::Small => "yolov8s-face.onnx",
            Self::Medium => "yolov8m-face.onnx",
            Self::Large => "yolov8l-face.onnx",
            Self::XLarge => "yolov8x-face.onnx",
        }
    }

    pub fn url(&self) -> String {
        format!("{MODEL_RELEASE_URL}/{}", self.file_name())
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}
