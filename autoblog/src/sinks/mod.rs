//! Persistence and publishing sinks.
//!
//! This module provides:
//! - The [`ContentStore`] and [`ContentPublisher`] capabilities
//! - The stored [`ContentRecord`] and publish outcome types
//! - An in-memory store
//! - Supabase and WordPress clients (behind the `http` feature)

mod memory;
mod publish;
mod store;
#[cfg(feature = "http")]
mod supabase;
#[cfg(feature = "http")]
mod wordpress;

pub use memory::InMemoryStore;
pub use publish::{ContentPublisher, PublishOutcome, PublishReceipt, PublishStatus};
pub use store::{ContentRecord, ContentStore, StoredContent, UserSettings};
#[cfg(feature = "http")]
pub use supabase::SupabaseStore;
#[cfg(feature = "http")]
pub use wordpress::WordPressPublisher;

#[cfg(test)]
pub use publish::MockContentPublisher;
#[cfg(test)]
pub use store::MockContentStore;
