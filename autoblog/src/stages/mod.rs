//! Stage trait and the four generation stages.
//!
//! Each stage turns one artifact into the next with a single completion
//! call. Stages hold only the collaborators they use and never retry.

mod brief;
mod draft;
mod finalize;
mod keywords;
mod ports;
mod research;

use async_trait::async_trait;
use std::fmt::Debug;

use crate::core::PipelineStage;
use crate::errors::AutoblogError;

pub use brief::{BriefInput, BriefStage};
pub use draft::{DraftInput, DraftStage, DEFAULT_WORD_COUNT};
pub use finalize::{FinalizeInput, FinalizeStage};
pub use keywords::{analyze_competitors, analyze_keywords, collect_sources, competitor_domains};
pub use ports::Collaborators;
pub use research::{ResearchStage, DEFAULT_MAX_SOURCES};

/// A pipeline step transforming one artifact into the next.
///
/// Inputs are taken by value; the caller keeps its own copy of upstream
/// artifacts, so a failed or abandoned run leaves them intact.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// What the stage consumes.
    type Input: Send + 'static;
    /// What the stage produces.
    type Output: Send + 'static;

    /// Returns which pipeline stage this is.
    fn stage(&self) -> PipelineStage;

    /// Runs the stage once.
    async fn run(&self, input: Self::Input) -> Result<Self::Output, AutoblogError>;
}
