//! Value records passed between pipeline stages.
//!
//! Each record is produced by exactly one stage and handed forward by value;
//! no stage mutates an upstream record.

mod brief;
mod content;
mod draft;
mod request;
mod research;
mod result;

pub use brief::{BriefSection, ContentBrief};
pub use content::{FinalContent, SeoRequirements};
pub use draft::{Draft, PlaceholderFormat, DEFAULT_PLACEHOLDER};
pub use request::{BlogRequest, TopicRequest, DEFAULT_AUDIENCE, DEFAULT_CONTENT_TYPE, DEFAULT_TONE};
pub use research::{CompetitorAnalysis, KeywordAnalysis, ResearchResult};
pub use result::PipelineResult;
