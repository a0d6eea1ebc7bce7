use camrig_core::{
    CameraId, CameraState, ExtensionBinding, ExtensionId, ExtensionOwner, ExtensionRoster,
    OffsetTally, OwnerHandle, PipelineStage, PositionOffsetExtension, Vec3,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Owner mock exposing its registry through a shared list.
#[derive(Default)]
struct RigOwner {
    extensions: Arc<Mutex<Vec<ExtensionId>>>,
}

impl RigOwner {
    fn with_registry() -> (OwnerHandle, Arc<Mutex<Vec<ExtensionId>>>) {
        let owner = Self::default();
        let registry = Arc::clone(&owner.extensions);
        (Arc::new(Mutex::new(owner)), registry)
    }
}

impl ExtensionOwner for RigOwner {
    fn add_extension(&mut self, id: ExtensionId) {
        let mut extensions = self.extensions.lock();
        if !extensions.contains(&id) {
            extensions.push(id);
        }
    }

    fn remove_extension(&mut self, id: ExtensionId) {
        self.extensions.lock().retain(|existing| *existing != id);
    }
}

/// Minimal stand-in for the out-of-scope pipeline driver: walks the owner's
/// registration order, runs every pre-pipeline hook once, then every stage in
/// order with one post-stage call per extension.
fn drive_frame(
    registry: &[ExtensionId],
    bindings: &BTreeMap<ExtensionId, Arc<Mutex<ExtensionBinding>>>,
    camera: CameraId,
    state: &mut CameraState,
    delta_seconds: f64,
) {
    for id in registry {
        bindings[id]
            .lock()
            .pre_pipeline_mutate(camera, state, delta_seconds);
    }
    for stage in PipelineStage::ordered() {
        for id in registry {
            bindings[id]
                .lock()
                .post_pipeline_stage(camera, *stage, state, delta_seconds);
        }
    }
}

fn connected_offset_binding(
    roster: &ExtensionRoster,
    owner: &OwnerHandle,
    offset: Vec3,
) -> Arc<Mutex<ExtensionBinding>> {
    let binding =
        ExtensionBinding::with_roster(roster, Box::new(PositionOffsetExtension::new(offset)));
    let mut guard = binding.lock();
    guard.attach_owner(owner);
    guard.bind(true).expect("connect");
    drop(guard);
    binding
}

#[test]
fn manager_children_keep_independent_extra_state() {
    let roster = ExtensionRoster::new();
    let (owner, registry) = RigOwner::with_registry();
    let binding = connected_offset_binding(&roster, &owner, Vec3::new(1.0, 0.0, 0.0));
    let bindings: BTreeMap<_, _> = [(binding.lock().id(), Arc::clone(&binding))].into();

    let child_x = Uuid::new_v4();
    let child_y = Uuid::new_v4();

    let mut state_x = CameraState::default();
    let mut state_y = CameraState::default();
    let order = registry.lock().clone();
    drive_frame(&order, &bindings, child_x, &mut state_x, 0.016);
    drive_frame(&order, &bindings, child_x, &mut state_x, 0.016);
    drive_frame(&order, &bindings, child_y, &mut state_y, 0.016);

    let guard = binding.lock();
    let tallies: Vec<u64> = guard
        .extra_state()
        .values::<OffsetTally>()
        .into_iter()
        .map(|tally| tally.applications)
        .collect();
    let mut sorted = tallies.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![1, 2], "X and Y tallies must be independent");

    // Driving X twice moved X twice; Y only once.
    assert_eq!(state_x.position, Vec3::new(2.0, 0.0, 0.0));
    assert_eq!(state_y.position, Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn extensions_run_in_registration_order_per_stage() {
    let roster = ExtensionRoster::new();
    let (owner, registry) = RigOwner::with_registry();

    // Registration order matters: the second offset observes the first one's
    // mutation within the same stage pass.
    let first = connected_offset_binding(&roster, &owner, Vec3::new(1.0, 0.0, 0.0));
    let second = connected_offset_binding(&roster, &owner, Vec3::new(0.0, 1.0, 0.0));
    let bindings: BTreeMap<_, _> = [
        (first.lock().id(), Arc::clone(&first)),
        (second.lock().id(), Arc::clone(&second)),
    ]
    .into();

    let order = registry.lock().clone();
    assert_eq!(order, vec![first.lock().id(), second.lock().id()]);

    let mut state = CameraState::default();
    drive_frame(&order, &bindings, Uuid::new_v4(), &mut state, 0.016);
    assert_eq!(state.position, Vec3::new(1.0, 1.0, 0.0));
}

#[test]
fn non_positive_delta_matches_fresh_baseline_through_the_binding() {
    let roster = ExtensionRoster::new();
    let (owner, _registry) = RigOwner::with_registry();
    let camera = Uuid::new_v4();

    // Freshly reset binding driven once with delta 0: the undamped baseline.
    let baseline = connected_offset_binding(&roster, &owner, Vec3::new(0.0, 3.0, 0.0));
    let mut baseline_state = CameraState::default();
    let mut guard = baseline.lock();
    guard.post_pipeline_stage(camera, PipelineStage::Body, &mut baseline_state, 0.0);
    let baseline_tally = **guard
        .extra_state()
        .values::<OffsetTally>()
        .first()
        .expect("baseline tally");
    drop(guard);

    // Warmed-up binding receiving delta -1 must match that baseline.
    let warmed = connected_offset_binding(&roster, &owner, Vec3::new(0.0, 3.0, 0.0));
    let mut guard = warmed.lock();
    let mut warm_state = CameraState::default();
    for _ in 0..4 {
        guard.post_pipeline_stage(camera, PipelineStage::Body, &mut warm_state, 0.016);
    }
    let mut reset_state = CameraState::default();
    guard.post_pipeline_stage(camera, PipelineStage::Body, &mut reset_state, -1.0);
    let reset_tally = **guard
        .extra_state()
        .values::<OffsetTally>()
        .first()
        .expect("post-reset tally");

    assert_eq!(reset_tally, baseline_tally);
    assert_eq!(reset_state.position, baseline_state.position);
}

#[test]
fn transition_and_warp_notifications_reach_the_behavior() {
    let roster = ExtensionRoster::new();
    let (owner, _registry) = RigOwner::with_registry();
    let binding = connected_offset_binding(&roster, &owner, Vec3::ZERO);
    let mut guard = binding.lock();

    // Baseline behavior keeps the defaults: no refresh request, no state.
    let refresh = guard.notify_transition_from_camera(Some(Uuid::new_v4()), Vec3::UP, -1.0);
    assert!(!refresh);
    guard.notify_target_warped(Uuid::new_v4(), Vec3::new(10.0, 0.0, 0.0));
    assert!(guard.extra_state().is_empty());
}

#[test]
fn reload_recovery_restores_registry_after_environment_wipe() {
    let roster = ExtensionRoster::new();
    let (owner, registry) = RigOwner::with_registry();
    let first = connected_offset_binding(&roster, &owner, Vec3::new(1.0, 0.0, 0.0));
    let second = connected_offset_binding(&roster, &owner, Vec3::new(0.0, 1.0, 0.0));

    // Simulated environment reload: owner registry wiped without notifying
    // the instances.
    registry.lock().clear();

    let report = roster.rebind_all();
    assert_eq!(report.rebound, 2);
    assert_eq!(report.owner_missing, 0);
    assert_eq!(
        registry.lock().len(),
        2,
        "both live instances must re-register"
    );
    assert!(first.lock().is_connected());
    assert!(second.lock().is_connected());
}
