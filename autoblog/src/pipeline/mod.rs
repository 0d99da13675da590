//! Pipeline configuration and execution.
//!
//! This module provides:
//! - [`PipelineConfig`], the explicit configuration passed at construction
//! - The [`Pipeline`] orchestrator and its [`PipelineRun`] record
//! - A caller-side retry helper; the orchestrator itself never retries

mod config;
mod orchestrator;
mod retry;


pub use config::{env, PipelineConfig};
pub use orchestrator::{Pipeline, PipelineRun};
pub use retry::{with_retry, BackoffStrategy, JitterStrategy, RetryConfig, Retryable};
