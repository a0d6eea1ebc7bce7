//! Core extension mechanism for the camrig camera-control pipeline.
//! This crate is the single source of truth for the binding, dispatch and
//! state-scoping invariants every extension rides on.

pub mod extension;
pub mod logging;
pub mod model;

pub use extension::binding::{BindError, ExtensionBinding};
pub use extension::contract::{
    CameraExtension, ExtensionId, ExtensionOwner, OwnerHandle, WeakOwnerHandle,
};
pub use extension::offset::{OffsetTally, PositionOffsetExtension};
pub use extension::roster::{
    global_roster, rebind_live_extensions, ExtensionRoster, RebindReport,
};
pub use extension::store::{ExtraStateError, ExtraStateStore};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{CameraId, CameraState, PipelineStage, TargetId, Vec3};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
