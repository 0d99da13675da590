//! Canned requests and provider payloads for pipeline tests.

use serde_json::{json, Value};

use crate::models::BlogRequest;
use crate::websearch::SearchHit;

/// Topic used across fixtures.
pub const TOPIC: &str = "AI in Healthcare";

/// User used across fixtures.
pub const USER_ID: &str = "user-123";

/// The placeholder left unresolved by [`draft_payload`].
pub const DRAFT_PLACEHOLDER: &str = "[PLACEHOLDER]2024 adoption statistic[PLACEHOLDER]";

/// A request for a post about [`TOPIC`].
#[must_use]
pub fn blog_request(publish: bool) -> BlogRequest {
    BlogRequest::new(USER_ID, TOPIC, ["AI", "healthcare"]).with_publish(publish)
}

/// Search hits from two domains.
#[must_use]
pub fn search_hits() -> Vec<SearchHit> {
    vec![
        SearchHit::new(
            "How AI is changing healthcare",
            "https://www.healthtech.example/ai-care",
            "AI tools help healthcare teams triage patients faster.",
        ),
        SearchHit::new(
            "Machine learning in hospitals",
            "https://news.example.org/ml-hospitals",
            "Hospitals adopt AI for imaging and scheduling.",
        ),
        SearchHit::new(
            "AI diagnostics review",
            "https://healthtech.example/diagnostics",
            "A review of diagnostic AI in healthcare.",
        ),
    ]
}

/// Research synthesis payload.
#[must_use]
pub fn research_payload() -> Value {
    json!({
        "key_points": [
            "AI speeds up diagnostic imaging",
            "Hospitals use AI to optimize scheduling",
            "Regulation shapes healthcare AI adoption"
        ],
        "content_gaps": ["Few articles cover small clinics"],
        "opportunities": ["Practical adoption checklist"]
    })
}

/// Brief payload whose keywords include the primary keyword.
#[must_use]
pub fn brief_payload() -> Value {
    json!({
        "title": "AI in Healthcare: What Clinicians Need to Know",
        "sections": [
            {"heading": "Why AI matters in healthcare", "description": "Context and stakes"},
            {"heading": "Diagnostics", "description": "Imaging and triage"},
            {"heading": "Operations", "description": "Scheduling and staffing"}
        ],
        "keywords": ["AI", "healthcare"],
        "references": ["https://healthtech.example/ai-care"],
        "style_guide": {"voice": "second person"}
    })
}

/// Brief payload with no sections.
#[must_use]
pub fn empty_brief_payload() -> Value {
    json!({
        "title": "AI in Healthcare",
        "sections": [],
        "keywords": ["AI"]
    })
}

/// Draft payload with one placeholder and a wrong self-reported word count.
#[must_use]
pub fn draft_payload() -> Value {
    json!({
        "title": "AI in Healthcare: What Clinicians Need to Know",
        "content": format!(
            "# AI in Healthcare\n\nAI is reshaping healthcare for clinicians and patients.\n\n\
             ## Diagnostics\n\nImaging models flag anomalies early. Adoption reached {DRAFT_PLACEHOLDER}.\n\n\
             ## Operations\n\nAI scheduling reduces waiting times in healthcare settings."
        ),
        "placeholders": [DRAFT_PLACEHOLDER],
        "word_count": 999
    })
}

/// Final payload that resolves the draft placeholder and proposes an
/// over-long meta description.
#[must_use]
pub fn final_payload() -> Value {
    json!({
        "title": "AI in Healthcare: What Clinicians Need to Know",
        "content": "# AI in Healthcare\n\nAI is reshaping healthcare for clinicians and patients.\n\n\
                    ## Diagnostics\n\nImaging models flag anomalies early. Adoption keeps rising across hospitals.\n\n\
                    ## Operations\n\nAI scheduling reduces waiting times in healthcare settings.",
        "meta_description": "Discover how AI is reshaping healthcare, from diagnostic imaging that flags anomalies \
                             early to scheduling tools that cut waiting times, and what clinicians need to know \
                             before adopting these systems in their own practice.",
        "headings": ["wrong"],
        "word_count": 1,
        "seo_score": 0.99
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{decode, DraftPayload, FinalPayload, ResearchSynthesis};
    use crate::core::PipelineStage;
    use crate::models::ContentBrief;

    #[test]
    fn test_payloads_decode() {
        assert!(decode::<ResearchSynthesis>(PipelineStage::Research, research_payload()).is_ok());
        assert!(decode::<ContentBrief>(PipelineStage::Brief, brief_payload()).is_ok());
        let draft: DraftPayload = decode(PipelineStage::Draft, draft_payload()).unwrap();
        assert!(draft.content.contains(DRAFT_PLACEHOLDER));
        let final_payload: FinalPayload = decode(PipelineStage::Finalize, final_payload()).unwrap();
        assert!(final_payload.meta_description.chars().count() > 160);
    }
}
