//! Utility functions for text analysis, scoring, hashing and timestamps.
//!
//! Everything here is deterministic apart from the clock and run id helpers.

mod seo;
mod text;
pub mod timestamps;

pub use seo::{seo_breakdown, seo_score, SeoBreakdown};
pub use text::{
    count_occurrences, count_words, derive_meta_description, extract_headings,
    normalize_whitespace, scan_placeholders, truncate_meta_description,
};
pub use timestamps::{format_iso8601, parse_timestamp, Timestamp};

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Generates a time-ordered run identifier.
#[must_use]
pub fn generate_run_id() -> Uuid {
    Uuid::now_v7()
}

/// Returns the hex SHA-256 digest of `content`.
#[must_use]
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_is_v7() {
        let id = generate_run_id();
        assert_eq!(id.get_version_num(), 7);
    }

    #[test]
    fn test_content_hash() {
        let hash = content_hash("hello");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_ne!(content_hash("hello"), content_hash("hello!"));
    }
}
