//! Face interaction-readiness perception for a robot camera stream.
//!
//! Detects faces per frame, assigns persistent identities across frames,
//! and derives a boolean "ready to interact" signal plus a per-frame
//! label → bounding-box map for downstream publication.
//!
//! Layout follows bounded contexts: `detection` (detector + assigner),
//! `pipeline` (filtering, readiness, frame loop), `video` (frame
//! acquisition), `publish` (signal delivery), `shared` (common types).

pub mod detection;
pub mod pipeline;
pub mod publish;
pub mod shared;
pub mod video;
