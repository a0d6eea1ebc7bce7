//! Extension-to-owner binding lifecycle.
//!
//! # Responsibility
//! - Attach/detach one extension instance to/from exactly one owning camera.
//! - Forward driver callbacks to the behavior together with the scoped store.
//!
//! # Invariants
//! - `bind` is fully idempotent in both directions; redundant lifecycle calls
//!   from the host are expected and harmless.
//! - The scoped store is reset at the end of every `bind` call, regardless of
//!   direction or outcome.
//! - A failed connect leaves the instance inert and recoverable by any later
//!   successful bind attempt.

use crate::extension::contract::{
    CameraExtension, ExtensionId, OwnerHandle, WeakOwnerHandle,
};
use crate::extension::roster::{global_roster, ExtensionRoster};
use crate::extension::store::ExtraStateStore;
use crate::model::{CameraId, CameraState, PipelineStage, TargetId, Vec3};
use log::{debug, error};
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Binding lifecycle errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// Connect was requested but no live owning camera is attached.
    OwnerMissing { extension_id: ExtensionId },
}

impl Display for BindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OwnerMissing { extension_id } => {
                write!(f, "no owning camera attached for extension: {extension_id}")
            }
        }
    }
}

impl Error for BindError {}

/// One live extension instance: behavior, owner link and scoped state.
///
/// The host creates a binding per behavior module, attaches the owning camera
/// handle once at construction time, and drives `bind` from its own lifecycle
/// (creation, destruction, environment reload). The pipeline driver later
/// dispatches callbacks through the binding so the behavior always receives
/// its scoped store.
pub struct ExtensionBinding {
    id: ExtensionId,
    behavior: Box<dyn CameraExtension>,
    owner: Option<WeakOwnerHandle>,
    connected: bool,
    extra: ExtraStateStore,
}

impl ExtensionBinding {
    /// Creates a binding registered in the process-wide roster.
    pub fn new(behavior: Box<dyn CameraExtension>) -> Arc<Mutex<ExtensionBinding>> {
        Self::with_roster(global_roster(), behavior)
    }

    /// Creates a binding registered in an explicit roster.
    ///
    /// Hosts embedding several independent rigs (and tests) use this to keep
    /// recovery passes scoped to their own instances.
    pub fn with_roster(
        roster: &ExtensionRoster,
        behavior: Box<dyn CameraExtension>,
    ) -> Arc<Mutex<ExtensionBinding>> {
        let binding = Arc::new(Mutex::new(ExtensionBinding {
            id: Uuid::new_v4(),
            behavior,
            owner: None,
            connected: false,
            extra: ExtraStateStore::new(),
        }));
        roster.register(&binding);
        binding
    }

    /// Attaches the owning camera entity handle.
    ///
    /// Performed by the host at construction time; the binding keeps only a
    /// weak back-reference so it never extends the owner's lifetime.
    pub fn attach_owner(&mut self, owner: &OwnerHandle) {
        self.owner = Some(Arc::downgrade(owner));
    }

    /// Connects (`true`) or disconnects (`false`) this instance from its
    /// owning camera's extension list.
    ///
    /// # Contract
    /// - Idempotent: callable redundantly from any lifecycle path, in any
    ///   order, in either direction.
    /// - The scoped store is emptied at the end of every call.
    ///
    /// # Errors
    /// - `BindError::OwnerMissing` when connecting with no attached or
    ///   already-dropped owner. Non-fatal: the instance stays unbound and a
    ///   later attempt (for example via `ensure_started`) can recover it.
    pub fn bind(&mut self, connect: bool) -> Result<(), BindError> {
        let outcome = self.apply_direction(connect);
        // Unconditional: no stale per-camera data may survive a rebind.
        self.extra.reset();
        outcome
    }

    /// Lazily (re)establishes the connected state on demand.
    ///
    /// Callable by the owning camera independently of host lifecycle
    /// ordering, for the case where the camera is live before this instance's
    /// own creation callback has run.
    pub fn ensure_started(&mut self) -> Result<(), BindError> {
        self.bind(true)
    }

    fn apply_direction(&mut self, connect: bool) -> Result<(), BindError> {
        let owner = match self.owner.as_ref().and_then(Weak::upgrade) {
            Some(owner) => owner,
            None => {
                self.connected = false;
                if connect {
                    error!(
                        "event=extension_bind module=extension status=error reason=owner_missing id={}",
                        self.id
                    );
                    return Err(BindError::OwnerMissing {
                        extension_id: self.id,
                    });
                }
                return Ok(());
            }
        };

        {
            let mut registry = owner.lock();
            if connect {
                registry.add_extension(self.id);
            } else {
                registry.remove_extension(self.id);
            }
        }
        self.connected = connect;
        debug!(
            "event=extension_bind module=extension status=ok direction={} id={}",
            if connect { "connect" } else { "disconnect" },
            self.id
        );
        Ok(())
    }

    /// Stable instance id used in the owner's extension list.
    pub fn id(&self) -> ExtensionId {
        self.id
    }

    /// Whether the most recent bind with a live owner connected.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Read access to the scoped store for diagnostics.
    pub fn extra_state(&self) -> &ExtraStateStore {
        &self.extra
    }

    /// Driver entry: pre-pipeline mutation hook.
    pub fn pre_pipeline_mutate(
        &mut self,
        camera: CameraId,
        state: &mut CameraState,
        delta_seconds: f64,
    ) {
        self.behavior
            .pre_pipeline_mutate(&mut self.extra, camera, state, delta_seconds);
    }

    /// Driver entry: per-stage mutation hook.
    pub fn post_pipeline_stage(
        &mut self,
        camera: CameraId,
        stage: PipelineStage,
        state: &mut CameraState,
        delta_seconds: f64,
    ) {
        self.behavior
            .post_pipeline_stage(&mut self.extra, camera, stage, state, delta_seconds);
    }

    /// Driver entry: active-camera transition notification.
    ///
    /// Returns `true` when the behavior requests an internal-state refresh
    /// from the owning camera.
    pub fn notify_transition_from_camera(
        &mut self,
        previous: Option<CameraId>,
        world_up: Vec3,
        delta_seconds: f64,
    ) -> bool {
        self.behavior
            .on_transition_from_camera(&mut self.extra, previous, world_up, delta_seconds)
    }

    /// Driver entry: tracked-target warp notification.
    pub fn notify_target_warped(&mut self, target: TargetId, position_delta: Vec3) {
        self.behavior
            .on_target_warped(&mut self.extra, target, position_delta);
    }
}
