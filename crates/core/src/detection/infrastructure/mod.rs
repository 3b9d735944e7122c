pub mod bytetrack_assigner;
pub mod onnx_face_detector;
