//! Web search collaborator.
//!
//! This module provides:
//! - The [`SearchHit`] model and the fallback result set
//! - The [`WebSearch`] capability trait
//! - Search client configuration
//! - A Brave Search client (behind the `http` feature)

#[cfg(feature = "http")]
mod brave;
mod config;
mod models;
mod protocols;

#[cfg(feature = "http")]
pub use brave::BraveSearch;
pub use config::SearchConfig;
pub use models::{extract_domain, fallback_results, SearchHit, FALLBACK_DESCRIPTION, FALLBACK_URL};
pub use protocols::{FallbackSearch, WebSearch};
