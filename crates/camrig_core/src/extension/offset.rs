//! Built-in baseline extension used to verify the dispatch path.
//!
//! Applies a fixed world-space offset after the body stage and keeps a
//! per-camera application tally in extra state. It intentionally performs no
//! framing or damping math; it exists so hosts (and this crate's tests) can
//! exercise the binding, dispatch and scoped-store machinery end to end.

use crate::extension::contract::CameraExtension;
use crate::extension::store::ExtraStateStore;
use crate::model::{CameraId, CameraState, PipelineStage, Vec3};
use log::error;

/// Per-camera bookkeeping for `PositionOffsetExtension`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OffsetTally {
    /// Stage applications since the last reset signal for this camera.
    pub applications: u64,
}

/// Baseline behavior: offset the camera position after the body stage.
pub struct PositionOffsetExtension {
    offset: Vec3,
}

impl PositionOffsetExtension {
    pub fn new(offset: Vec3) -> Self {
        Self { offset }
    }

    /// Configured world-space offset.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }
}

impl CameraExtension for PositionOffsetExtension {
    fn post_pipeline_stage(
        &mut self,
        extra: &mut ExtraStateStore,
        camera: CameraId,
        stage: PipelineStage,
        state: &mut CameraState,
        delta_seconds: f64,
    ) {
        if stage != PipelineStage::Body {
            return;
        }

        let tally = match extra.get_or_default::<OffsetTally>(camera) {
            Ok(tally) => tally,
            Err(err) => {
                error!("event=extension_offset module=extension status=error detail={err}");
                return;
            }
        };
        if delta_seconds <= 0.0 {
            // Reset signal: behave exactly like a first-ever invocation.
            *tally = OffsetTally::default();
        }
        tally.applications += 1;

        state.position = state.position.offset_by(self.offset);
    }
}
