//! Camera identity handles and the mutable per-frame camera state.
//!
//! # Responsibility
//! - Define the opaque handles used to key per-camera extension state.
//! - Define the camera-state record mutated in place by pipeline callbacks.
//!
//! # Invariants
//! - `CameraId` is stable for the lifetime of a logical camera and is used
//!   only as a lookup key, never dereferenced by the extension core.
//! - `CameraState` is owned by the pipeline driver; the core only receives a
//!   mutable view during a callback.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for one logical camera.
///
/// A manager camera and each of its children carry distinct ids, so one
/// extension instance can key private state per child without collisions.
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type CameraId = Uuid;

/// Stable identifier for an externally tracked target object.
pub type TargetId = Uuid;

/// Minimal three-component vector for world-up directions and position
/// deltas.
///
/// This is deliberately not a math library: extensions get just enough to
/// carry a delta through the warp-notification path. Framing and transform
/// math live outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// All-zero vector.
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Conventional world-up direction (+Y).
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns this vector translated by `delta`.
    pub fn offset_by(self, delta: Vec3) -> Vec3 {
        Vec3 {
            x: self.x + delta.x,
            y: self.y + delta.y,
            z: self.z + delta.z,
        }
    }
}

/// Computed camera state handed to every pipeline callback.
///
/// The driver owns this record and passes `&mut CameraState` through the
/// callback chain; extensions mutate fields in place before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is aimed at, when an aim target exists.
    pub aim_target: Option<Vec3>,
    /// World-up direction used by aim stages.
    pub world_up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            aim_target: None,
            world_up: Vec3::UP,
            fov_degrees: 60.0,
        }
    }
}
