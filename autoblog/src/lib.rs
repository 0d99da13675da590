//! # Autoblog
//!
//! A staged content pipeline that turns a topic and a few keywords into a
//! finished blog post.
//!
//! Autoblog runs four generation stages, each a single schema-checked call to
//! a completion provider:
//!
//! - **Research**: web search, keyword and competitor analysis, synthesis
//! - **Brief**: a sectioned content plan
//! - **Draft**: the first full text, with placeholders for unknown facts
//! - **Finalize**: SEO polish with a deterministic score
//!
//! The final content is then stored and, if requested, published.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use autoblog::prelude::*;
//!
//! let config = PipelineConfig::from_env()?;
//! let pipeline = Pipeline::new(config.clone(), Collaborators::from_config(&config)?);
//!
//! let request = BlogRequest::new("user-123", "AI in Healthcare", ["AI", "healthcare"]);
//! let result = pipeline.create_blog_post(&request).await;
//! println!("{}: {}", result.status, result.message);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod contracts;
pub mod core;
pub mod errors;
pub mod events;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod providers;
pub mod sinks;
pub mod stages;
pub mod testing;
pub mod utils;
pub mod websearch;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{PipelineStage, PipelineState, RunStatus, StageArtifact};
    pub use crate::errors::{AutoblogError, ErrorKind, ProviderError, SearchError, SinkError};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::models::{
        BlogRequest, ContentBrief, Draft, FinalContent, PipelineResult, PlaceholderFormat,
        ResearchResult, SeoRequirements, TopicRequest,
    };
    pub use crate::pipeline::{with_retry, Pipeline, PipelineConfig, PipelineRun, RetryConfig};
    pub use crate::providers::CompletionProvider;
    pub use crate::sinks::{ContentPublisher, ContentRecord, ContentStore, InMemoryStore};
    pub use crate::stages::{Collaborators, Stage};
    pub use crate::websearch::{SearchHit, WebSearch};
}
