pub mod frame_processor;
pub mod monitor_faces_use_case;
pub mod pipeline_logger;
pub mod readiness_evaluator;
