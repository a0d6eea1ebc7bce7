//! Shared camera-domain types.

pub mod camera;
pub mod stage;

pub use camera::{CameraId, CameraState, TargetId, Vec3};
pub use stage::PipelineStage;
