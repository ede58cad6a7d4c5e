use serde::Serialize;

use super::domain::Stage;
use super::repository::PipelineEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCountEntry {
    pub stage: Stage,
    pub stage_label: &'static str,
    pub count: usize,
}

/// Funnel view over the current pipeline: how many candidates sit in each stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub total: usize,
    pub stages: Vec<StageCountEntry>,
}

impl PipelineSummary {
    pub fn from_entries(entries: &[PipelineEntry]) -> Self {
        let stages = Stage::ordered()
            .into_iter()
            .map(|stage| StageCountEntry {
                stage,
                stage_label: stage.label(),
                count: entries.iter().filter(|entry| entry.stage == stage).count(),
            })
            .collect();

        Self {
            total: entries.len(),
            stages,
        }
    }

    pub fn count(&self, stage: Stage) -> usize {
        self.stages
            .iter()
            .find(|entry| entry.stage == stage)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}
