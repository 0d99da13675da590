//! Stage contracts with the completion provider.
//!
//! This module provides:
//! - Output schema descriptors per stage
//! - Typed payload decoding
//! - Role instructions

mod instructions;
mod payloads;
mod schema;

pub use instructions::{
    BRIEF_INSTRUCTIONS, DRAFT_INSTRUCTIONS, FINALIZE_INSTRUCTIONS, RESEARCH_INSTRUCTIONS,
};
pub use payloads::{decode, DraftPayload, FinalPayload, ResearchSynthesis};
pub use schema::{OutputSchema, CONTENT_BRIEF, DRAFT, FINAL_CONTENT, RESEARCH_SYNTHESIS};
