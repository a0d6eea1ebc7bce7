//! Per-owner scoped state store for one extension instance.
//!
//! # Responsibility
//! - Map each camera identity to one private, strongly-typed state blob.
//! - Create entries on demand from `Default`; never drop them implicitly.
//!
//! # Invariants
//! - Entries are removed only by `reset()`, never by lookup paths.
//! - A given camera id must always be queried with the same state type; the
//!   store enforces this with a checked downcast instead of silent reuse.

use crate::model::CameraId;
use std::any::Any;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Scoped-store access errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtraStateError {
    /// An existing entry for this camera holds a different state type.
    TypeMismatch { camera: CameraId },
}

impl Display for ExtraStateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch { camera } => {
                write!(f, "extra state type mismatch for camera: {camera}")
            }
        }
    }
}

impl Error for ExtraStateError {}

/// Private per-camera state mapping owned by one extension instance.
///
/// One extension instance may be driven on behalf of many camera identities
/// (a manager camera and its children); each identity gets an independent
/// entry so state never bleeds between cameras.
#[derive(Default)]
pub struct ExtraStateStore {
    entries: BTreeMap<CameraId, Box<dyn Any + Send>>,
}

impl ExtraStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state blob for `camera`, creating it from `T::default()`
    /// on first lookup.
    ///
    /// # Contract
    /// - Always queries one camera id with the same `T` for the lifetime of
    ///   the owning extension instance.
    ///
    /// # Errors
    /// - Returns `ExtraStateError::TypeMismatch` when an existing entry was
    ///   created with a different state type.
    pub fn get_or_default<T>(&mut self, camera: CameraId) -> Result<&mut T, ExtraStateError>
    where
        T: Default + Send + 'static,
    {
        let entry = self
            .entries
            .entry(camera)
            .or_insert_with(|| Box::new(T::default()));
        entry
            .downcast_mut::<T>()
            .ok_or(ExtraStateError::TypeMismatch { camera })
    }

    /// Returns every stored value of type `T`.
    ///
    /// Full-store scan intended for infrequent diagnostics/tooling, not for
    /// per-frame use. Entries of other types are skipped.
    pub fn values<T: 'static>(&self) -> Vec<&T> {
        self.entries
            .values()
            .filter_map(|entry| entry.downcast_ref::<T>())
            .collect()
    }

    /// Clears every entry.
    ///
    /// Called automatically on every bind/unbind transition so no stale
    /// per-camera data survives a rebind.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
