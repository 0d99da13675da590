//! Core pipeline types.
//!
//! This module contains the types the orchestrator reasons about:
//! - Pipeline stages, the state machine and run status
//! - Stage artifacts kept for diagnostics and resume

mod artifact;
mod status;

pub use artifact::StageArtifact;
pub use status::{PipelineStage, PipelineState, RunStatus};
