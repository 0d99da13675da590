//! Stage artifact type for capturing the last good output of a run.

use serde::{Deserialize, Serialize};

use super::PipelineStage;
use crate::models::{ContentBrief, Draft, FinalContent, ResearchResult};

/// An artifact produced by a content stage.
///
/// When a run fails, the last artifact is reported alongside the error so the
/// caller can inspect it or hand it to another attempt of the next stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StageArtifact {
    /// Output of the research stage.
    Research(ResearchResult),
    /// Output of the brief stage.
    Brief(ContentBrief),
    /// Output of the draft stage.
    Draft(Draft),
    /// Output of the finalize stage.
    Final(FinalContent),
}

impl StageArtifact {
    /// Returns the stage that produced the artifact.
    #[must_use]
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Research(_) => PipelineStage::Research,
            Self::Brief(_) => PipelineStage::Brief,
            Self::Draft(_) => PipelineStage::Draft,
            Self::Final(_) => PipelineStage::Finalize,
        }
    }

    /// Returns the title the artifact carries, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Research(r) => Some(r.topic.as_str()),
            Self::Brief(b) => Some(b.title.as_str()),
            Self::Draft(d) => Some(d.title.as_str()),
            Self::Final(f) => Some(f.title.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BriefSection, PlaceholderFormat};
    use std::collections::BTreeMap;

    #[test]
    fn test_artifact_stage() {
        let draft = Draft::from_content("Draft title", "Some body text", &PlaceholderFormat::default());
        let artifact = StageArtifact::Draft(draft);
        assert_eq!(artifact.stage(), PipelineStage::Draft);
        assert_eq!(artifact.title(), Some("Draft title"));
    }

    #[test]
    fn test_artifact_serialization_is_tagged() {
        let brief = ContentBrief {
            title: "Brief".to_string(),
            sections: vec![BriefSection::new("Intro", "")],
            keywords: vec!["AI".to_string()],
            references: Vec::new(),
            style_guide: BTreeMap::new(),
        };
        let json = serde_json::to_value(StageArtifact::Brief(brief)).unwrap();
        assert_eq!(json["type"], "brief");
        assert_eq!(json["data"]["title"], "Brief");

        let back: StageArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(back.stage(), PipelineStage::Brief);
    }
}
