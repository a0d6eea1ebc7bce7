//! Named pipeline stages of the per-frame camera computation.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stage string id for the body (positioning) phase.
pub const STAGE_BODY: &str = "body";
/// Stage string id for the aim (orientation) phase.
pub const STAGE_AIM: &str = "aim";
/// Stage string id for the procedural noise phase.
pub const STAGE_NOISE: &str = "noise";
/// Stage string id for the final correction phase.
pub const STAGE_FINALIZE: &str = "finalize";

/// One named phase of the driver's per-frame camera-state computation.
///
/// The driver invokes `post_pipeline_stage` once per stage per attached
/// extension, in this declaration order, after the stage's core computation
/// completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Positions the camera in space.
    Body,
    /// Orients the camera toward its aim target.
    Aim,
    /// Applies procedural shake/noise.
    Noise,
    /// Final corrections before the state is consumed.
    Finalize,
}

impl PipelineStage {
    /// Stable string id used in diagnostics and log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Body => STAGE_BODY,
            Self::Aim => STAGE_AIM,
            Self::Noise => STAGE_NOISE,
            Self::Finalize => STAGE_FINALIZE,
        }
    }

    /// All stages in driver execution order.
    pub fn ordered() -> &'static [PipelineStage] {
        &[Self::Body, Self::Aim, Self::Noise, Self::Finalize]
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
