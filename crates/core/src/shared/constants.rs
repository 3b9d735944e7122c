/// Camera frame dimensions of the robot head stream.
pub const DEFAULT_FRAME_WIDTH: u32 = 672;
pub const DEFAULT_FRAME_HEIGHT: u32 = 376;

/// Detections at or below this confidence are discarded (strict gate).
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.6;

/// Minimum bounding-box area as a fraction of the frame area (strict gate).
pub const DEFAULT_MIN_AREA_RATIO: f64 = 0.003;

/// Absolute bounding-box area in px² above which a face is close enough
/// to start an interaction. Independent of [`DEFAULT_MIN_AREA_RATIO`];
/// the two gates apply at different pipeline stages.
pub const DEFAULT_READY_AREA: f64 = 2500.0;

/// Max frames a track can be lost before removal (~0.5 seconds at 60 fps).
pub const TRACKER_MAX_LOST: usize = 30;

/// Frame loop frequency cap in Hz.
pub const DEFAULT_LOOP_RATE_HZ: f64 = 60.0;

pub const MODEL_RELEASE_URL: &str =
    "https://github.com/facesense/facesense/releases/download/v0.1.0";
