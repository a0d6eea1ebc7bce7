//! Live-instance roster and the environment-reload recovery pass.
//!
//! # Responsibility
//! - Track weak back-references to every live extension binding.
//! - Rebind all live instances after an external environment reload, which
//!   can invalidate owner registries without notifying the instances.
//!
//! # Invariants
//! - Every binding registers itself at construction time.
//! - Dropped bindings are pruned lazily; the roster never keeps an instance
//!   alive.
//! - Each rebind in a recovery pass is independently idempotent, so a
//!   partially completed pass leaves the system consistent and re-recoverable.

use crate::extension::binding::{BindError, ExtensionBinding};
use crate::extension::contract::ExtensionId;
use log::info;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

static GLOBAL_ROSTER: Lazy<ExtensionRoster> = Lazy::new(ExtensionRoster::new);

/// Returns the process-wide roster used by `ExtensionBinding::new`.
pub fn global_roster() -> &'static ExtensionRoster {
    &GLOBAL_ROSTER
}

/// Rebinds every live extension instance in the process-wide roster.
///
/// Entry point for the host's "runtime environment was reloaded" signal; not
/// part of normal steady-state operation.
pub fn rebind_live_extensions() -> RebindReport {
    global_roster().rebind_all()
}

/// Outcome counts of one recovery pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RebindReport {
    /// Instances reconnected to a live owner.
    pub rebound: usize,
    /// Instances left inert because no owner could be resolved.
    pub owner_missing: usize,
    /// Stale entries pruned because the instance was dropped.
    pub pruned: usize,
}

/// Explicit registry of live extension bindings.
///
/// Holds weak references only: construction registers, drop is observed as a
/// failed upgrade and pruned on the next pass.
#[derive(Default)]
pub struct ExtensionRoster {
    slots: Mutex<BTreeMap<ExtensionId, Weak<Mutex<ExtensionBinding>>>>,
}

impl ExtensionRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one live binding.
    pub fn register(&self, binding: &Arc<Mutex<ExtensionBinding>>) {
        let id = binding.lock().id();
        self.slots.lock().insert(id, Arc::downgrade(binding));
    }

    /// Number of registered slots, including not-yet-pruned stale entries.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Calls `bind(true)` on every live instance and prunes dropped ones.
    ///
    /// Owner-missing failures are already logged by the binding itself and
    /// counted here; they do not abort the pass.
    pub fn rebind_all(&self) -> RebindReport {
        let slots: Vec<(ExtensionId, Weak<Mutex<ExtensionBinding>>)> = self
            .slots
            .lock()
            .iter()
            .map(|(id, slot)| (*id, Weak::clone(slot)))
            .collect();

        let mut report = RebindReport::default();
        let mut dead: Vec<ExtensionId> = Vec::new();
        for (id, slot) in slots {
            match slot.upgrade() {
                Some(binding) => match binding.lock().bind(true) {
                    Ok(()) => report.rebound += 1,
                    Err(BindError::OwnerMissing { .. }) => report.owner_missing += 1,
                },
                None => {
                    dead.push(id);
                    report.pruned += 1;
                }
            }
        }

        if !dead.is_empty() {
            let mut slots = self.slots.lock();
            for id in dead {
                slots.remove(&id);
            }
        }

        info!(
            "event=extension_rebind module=extension status=ok rebound={} owner_missing={} pruned={}",
            report.rebound, report.owner_missing, report.pruned
        );
        report
    }
}
