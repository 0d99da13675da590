//! Pipeline stage, state and run status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::AutoblogError;

/// A step of the content pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Topic + keywords to research result.
    Research,
    /// Research result to content brief.
    Brief,
    /// Content brief to draft.
    Draft,
    /// Draft to final content.
    Finalize,
    /// Final content to the persistence sink.
    Store,
    /// Stored content to the publishing sink.
    Publish,
}

impl PipelineStage {
    /// All stages in execution order.
    pub const ALL: [Self; 6] = [
        Self::Research,
        Self::Brief,
        Self::Draft,
        Self::Finalize,
        Self::Store,
        Self::Publish,
    ];

    /// Returns the stable name of the stage.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Brief => "brief",
            Self::Draft => "draft",
            Self::Finalize => "finalize",
            Self::Store => "store",
            Self::Publish => "publish",
        }
    }

    /// Returns the state the pipeline is in while this stage runs.
    #[must_use]
    pub fn running_state(&self) -> PipelineState {
        match self {
            Self::Research => PipelineState::Researching,
            Self::Brief => PipelineState::Briefing,
            Self::Draft => PipelineState::Drafting,
            Self::Finalize => PipelineState::Finalizing,
            Self::Store => PipelineState::Storing,
            Self::Publish => PipelineState::Publishing,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The orchestrator's state machine.
///
/// `Idle → Researching → Briefing → Drafting → Finalizing → Storing →
/// Publishing? → Done`, with any stage able to move to `Failed`.
#[derive(Debug, Clone)]
pub enum PipelineState {
    /// Nothing has run yet.
    Idle,
    /// The research stage is running.
    Researching,
    /// The brief stage is running.
    Briefing,
    /// The draft stage is running.
    Drafting,
    /// The finalize stage is running.
    Finalizing,
    /// The persistence sink is being called.
    Storing,
    /// The publishing sink is being called.
    Publishing,
    /// Terminal: the run finished with success or partial success.
    Done(RunStatus),
    /// Terminal: a stage failed.
    Failed {
        /// The stage that failed.
        stage: PipelineStage,
        /// The failure.
        error: AutoblogError,
    },
}

impl PipelineState {
    /// Returns true if the state is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Failed { .. })
    }

    /// Returns the stage currently running, if any.
    #[must_use]
    pub fn running_stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Researching => Some(PipelineStage::Research),
            Self::Briefing => Some(PipelineStage::Brief),
            Self::Drafting => Some(PipelineStage::Draft),
            Self::Finalizing => Some(PipelineStage::Finalize),
            Self::Storing => Some(PipelineStage::Store),
            Self::Publishing => Some(PipelineStage::Publish),
            Self::Idle | Self::Done(_) | Self::Failed { .. } => None,
        }
    }

    /// Whether `next` is a legal successor of this state.
    #[must_use]
    pub fn can_transition_to(&self, next: &Self) -> bool {
        match (self, next) {
            (Self::Idle, Self::Researching)
            | (Self::Researching, Self::Briefing)
            | (Self::Briefing, Self::Drafting)
            | (Self::Drafting, Self::Finalizing)
            | (Self::Finalizing, Self::Storing)
            | (Self::Storing, Self::Publishing | Self::Done(_))
            | (Self::Publishing, Self::Done(_)) => true,
            (Self::Idle, Self::Failed { stage, .. }) => *stage == PipelineStage::Research,
            (current, Self::Failed { stage, .. }) => current.running_stage() == Some(*stage),
            _ => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Researching => write!(f, "researching"),
            Self::Briefing => write!(f, "briefing"),
            Self::Drafting => write!(f, "drafting"),
            Self::Finalizing => write!(f, "finalizing"),
            Self::Storing => write!(f, "storing"),
            Self::Publishing => write!(f, "publishing"),
            Self::Done(status) => write!(f, "done({status})"),
            Self::Failed { stage, .. } => write!(f, "failed({stage})"),
        }
    }
}

/// Caller-visible outcome of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Content was finalized, stored and (if requested) published.
    Success,
    /// Content was finalized and stored but not published.
    Partial,
    /// The run failed before content could be stored.
    Error,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Partial => write!(f, "partial"),
            Self::Error => write!(f, "error"),
        }
    }
}
