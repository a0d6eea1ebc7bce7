//! Pipeline callback contract and owner boundary contract.
//!
//! # Responsibility
//! - Define the operations every extension behavior implements.
//! - Define the interface the owning camera entity exposes to bindings.
//!
//! # Invariants
//! - The driver runs `pre_pipeline_mutate` for all attached extensions once
//!   before stage processing begins.
//! - `post_pipeline_stage` runs once per stage per extension, in registration
//!   order, after that stage's core computation completes.
//! - `delta_seconds <= 0` is the reset signal: no time-based effect may be
//!   applied and smoothing accumulators must be discarded.

use crate::extension::store::ExtraStateStore;
use crate::model::{CameraId, CameraState, PipelineStage, TargetId, Vec3};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Stable identifier for one extension instance.
pub type ExtensionId = Uuid;

/// Shared handle to an owning camera entity.
pub type OwnerHandle = Arc<Mutex<dyn ExtensionOwner>>;

/// Non-owning back-reference to an owning camera entity.
pub type WeakOwnerHandle = Weak<Mutex<dyn ExtensionOwner>>;

/// Boundary contract of the owning camera entity.
///
/// The owner keeps the ordered list of attached extensions that the driver
/// walks during its update pass. Both operations must be safe to call
/// redundantly, since bindings re-drive them on every `bind` call.
pub trait ExtensionOwner: Send {
    /// Registers one extension id.
    ///
    /// # Contract
    /// - No-op when the id is already registered (first registration keeps
    ///   its position in the invocation order).
    fn add_extension(&mut self, id: ExtensionId);

    /// Removes one extension id.
    ///
    /// # Contract
    /// - No-op when the id is not registered.
    fn remove_extension(&mut self, id: ExtensionId);
}

/// Behavior contract invoked by the pipeline driver through a binding.
///
/// One required operation (`post_pipeline_stage`) plus three hooks with
/// documented no-op defaults. The scoped store arrives as an explicit context
/// argument; implementations key it by the camera id the driver passes, so
/// one behavior instance can serve a manager camera and all of its children
/// without state collisions.
pub trait CameraExtension: Send {
    /// Mutates `state` after the driver completes `stage` for `camera`.
    ///
    /// # Contract
    /// - `delta_seconds <= 0` is a reset request: discard any time-based
    ///   accumulators held in `extra` for this camera and apply an
    ///   instantaneous (undamped) result for this call.
    fn post_pipeline_stage(
        &mut self,
        extra: &mut ExtraStateStore,
        camera: CameraId,
        stage: PipelineStage,
        state: &mut CameraState,
        delta_seconds: f64,
    );

    /// Mutates `state` before the driver begins its per-stage pass.
    ///
    /// Default: no-op.
    fn pre_pipeline_mutate(
        &mut self,
        _extra: &mut ExtraStateStore,
        _camera: CameraId,
        _state: &mut CameraState,
        _delta_seconds: f64,
    ) {
    }

    /// Notifies that the owning camera became the active camera.
    ///
    /// Returns `true` to request an internal-state refresh from the owning
    /// camera. Must tolerate `delta_seconds <= 0` (no time-based effect).
    ///
    /// Default: no-op, no refresh requested.
    fn on_transition_from_camera(
        &mut self,
        _extra: &mut ExtraStateStore,
        _previous: Option<CameraId>,
        _world_up: Vec3,
        _delta_seconds: f64,
    ) -> bool {
        false
    }

    /// Notifies that a tracked target was instantaneously relocated.
    ///
    /// Implementations should apply `position_delta` to any cached position
    /// derived from `target`, avoiding a visible discontinuity.
    ///
    /// Default: no-op.
    fn on_target_warped(
        &mut self,
        _extra: &mut ExtraStateStore,
        _target: TargetId,
        _position_delta: Vec3,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraExtension, ExtraStateStore};
    use crate::model::{CameraState, PipelineStage, Vec3};
    use uuid::Uuid;

    struct StageOnly;

    impl CameraExtension for StageOnly {
        fn post_pipeline_stage(
            &mut self,
            _extra: &mut ExtraStateStore,
            _camera: crate::model::CameraId,
            _stage: PipelineStage,
            state: &mut CameraState,
            _delta_seconds: f64,
        ) {
            state.fov_degrees = 30.0;
        }
    }

    #[test]
    fn default_hooks_are_no_ops() {
        let mut extension = StageOnly;
        let mut extra = ExtraStateStore::new();
        let mut state = CameraState::default();
        let camera = Uuid::new_v4();

        extension.pre_pipeline_mutate(&mut extra, camera, &mut state, 0.016);
        assert_eq!(state, CameraState::default());

        let refresh =
            extension.on_transition_from_camera(&mut extra, None, Vec3::UP, -1.0);
        assert!(!refresh, "default transition hook requests no refresh");

        extension.on_target_warped(&mut extra, Uuid::new_v4(), Vec3::new(1.0, 0.0, 0.0));
        assert!(extra.is_empty());
    }

    #[test]
    fn required_stage_hook_mutates_state_in_place() {
        let mut extension = StageOnly;
        let mut extra = ExtraStateStore::new();
        let mut state = CameraState::default();

        extension.post_pipeline_stage(
            &mut extra,
            Uuid::new_v4(),
            PipelineStage::Body,
            &mut state,
            0.016,
        );
        assert_eq!(state.fov_degrees, 30.0);
    }
}
