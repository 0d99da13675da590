//! Testing utilities for autoblog pipelines.
//!
//! This module provides:
//! - A scripted completion provider
//! - Static and failing search collaborators
//! - Recording and failing sinks
//! - Request and payload fixtures

pub mod fixtures;
mod mocks;

pub use mocks::{
    FailingPublisher, FailingSearch, FailingStore, RecordingPublisher, ScriptedCompletionProvider,
    StaticSearch,
};
