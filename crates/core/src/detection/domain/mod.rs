pub mod detection;
pub mod detection_filter;
pub mod face_detector;
pub mod model_variant;
pub mod track_assigner;
