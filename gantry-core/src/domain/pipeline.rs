//! Pipeline domain types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SpecError;

/// Opaque identifier of a work item, usually the job URL on the build server
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkItemId(String);

impl WorkItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for WorkItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Work items executed strictly one after another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chain(pub Vec<WorkItemId>);

impl Chain {
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<WorkItemId>,
    {
        Self(items.into_iter().map(Into::into).collect())
    }

    pub fn items(&self) -> &[WorkItemId] {
        &self.0
    }
}

/// Chains that start together; the stage ends when the slowest chain ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stage(pub Vec<Chain>);

impl Stage {
    pub fn new(chains: impl IntoIterator<Item = Chain>) -> Self {
        Self(chains.into_iter().collect())
    }

    pub fn chains(&self) -> &[Chain] {
        &self.0
    }
}

/// Pipeline specification
///
/// Ordered stages, each a set of parallel chains. The on-disk form is the
/// nested `job_groups` array:
///
/// ```json
/// { "job_groups": [ [ ["job url 1", "job url 2"] ], [ ["job url 3"], ["job url 4"] ] ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSpec {
    #[serde(rename = "job_groups")]
    pub stages: Vec<Stage>,
}

impl PipelineSpec {
    pub fn new(stages: impl IntoIterator<Item = Stage>) -> Self {
        Self {
            stages: stages.into_iter().collect(),
        }
    }

    /// Parse a pipeline specification from JSON and validate its structure
    pub fn from_json(source: &str) -> Result<Self, SpecError> {
        let spec: PipelineSpec =
            serde_json::from_str(source).map_err(|e| SpecError::Parse(e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check the structural invariants: at least one stage, no empty stage,
    /// no empty chain
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.stages.is_empty() {
            return Err(SpecError::NoStages);
        }

        for (stage_idx, stage) in self.stages.iter().enumerate() {
            if stage.0.is_empty() {
                return Err(SpecError::EmptyStage { stage: stage_idx });
            }
            for (chain_idx, chain) in stage.0.iter().enumerate() {
                if chain.0.is_empty() {
                    return Err(SpecError::EmptyChain {
                        stage: stage_idx,
                        chain: chain_idx,
                    });
                }
            }
        }

        Ok(())
    }

    /// Total number of work item occurrences across all stages and chains
    pub fn work_item_count(&self) -> usize {
        self.stages
            .iter()
            .flat_map(|stage| stage.0.iter())
            .map(|chain| chain.0.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_groups() {
        let source = r#"{
            "job_groups": [
                [["job url 1", "job url 2", "job url 3", "job url 4"]],
                [["job url 5", "job url 6"], ["job url 7", "job url 8"]],
                [["job url 9"]]
            ]
        }"#;

        let spec = PipelineSpec::from_json(source).unwrap();
        assert_eq!(spec.stages.len(), 3);
        assert_eq!(spec.stages[1].chains().len(), 2);
        assert_eq!(spec.stages[1].chains()[1].items()[0].as_str(), "job url 7");
        assert_eq!(spec.work_item_count(), 9);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = PipelineSpec::from_json("{ not json");
        assert!(matches!(result, Err(SpecError::Parse(_))));
    }

    #[test]
    fn test_missing_job_groups_field() {
        let result = PipelineSpec::from_json(r#"{ "stages": [] }"#);
        assert!(matches!(result, Err(SpecError::Parse(_))));
    }

    #[test]
    fn test_no_stages() {
        let result = PipelineSpec::from_json(r#"{ "job_groups": [] }"#);
        assert!(matches!(result, Err(SpecError::NoStages)));
    }

    #[test]
    fn test_empty_stage() {
        let spec = PipelineSpec::new([Stage::new([Chain::new(["a"])]), Stage::new([])]);
        assert!(matches!(
            spec.validate(),
            Err(SpecError::EmptyStage { stage: 1 })
        ));
    }

    #[test]
    fn test_empty_chain() {
        let spec = PipelineSpec::new([Stage::new([
            Chain::new(["a"]),
            Chain::new(Vec::<&str>::new()),
        ])]);
        let err = spec.validate().unwrap_err();
        assert!(matches!(err, SpecError::EmptyChain { stage: 0, chain: 1 }));
        assert!(err.to_string().contains("chain 1"));
    }

    #[test]
    fn test_serialize_round_trip_shape() {
        let spec = PipelineSpec::new([Stage::new([Chain::new(["a", "b"])])]);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json, serde_json::json!({ "job_groups": [[["a", "b"]]] }));
    }
}
