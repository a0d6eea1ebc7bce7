//! Extension mechanism for the camera-control pipeline.
//!
//! This module defines the binding lifecycle between extension instances and
//! their owning camera, the callback contract the pipeline driver invokes,
//! the per-camera scoped state store, and the live-instance roster used for
//! environment-reload recovery. The pipeline driver itself and concrete
//! framing behaviors are out of scope.

pub mod binding;
pub mod contract;
pub mod offset;
pub mod roster;
pub mod store;
