use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CandidateId, CandidateProfile, RecruitmentRecord, Stage};
use super::stage::derive_stage;

/// Everything the pipeline persists: current rows plus the snapshot history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineState {
    #[serde(default)]
    pub records: BTreeMap<CandidateId, RecruitmentRecord>,
    #[serde(default)]
    pub history: Vec<PipelineSnapshot>,
}

impl PipelineState {
    /// Every row must be filed under its own candidate id.
    pub fn verify_keys(&self) -> Result<(), RepositoryError> {
        match self
            .records
            .iter()
            .find(|(key, record)| **key != record.candidate_id)
        {
            Some((key, record)) => Err(RepositoryError::Corrupt(format!(
                "row stored under {key} belongs to {}",
                record.candidate_id
            ))),
            None => Ok(()),
        }
    }
}

/// Point-in-time capture of the pipeline. Never modified once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSnapshot {
    pub id: String,
    pub taken_at: DateTime<Utc>,
    pub entries: Vec<SnapshotEntry>,
}

/// A record as it stood when the snapshot was taken, with its profile denormalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEntry {
    pub record: RecruitmentRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<CandidateProfile>,
}

impl SnapshotEntry {
    /// Stage as derived from the captured columns.
    pub fn stage(&self) -> Stage {
        derive_stage(&self.record)
    }
}

/// A live record paired with its derived stage for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineEntry {
    pub record: RecruitmentRecord,
    pub stage: Stage,
    pub stage_label: &'static str,
}

impl From<RecruitmentRecord> for PipelineEntry {
    fn from(record: RecruitmentRecord) -> Self {
        let stage = derive_stage(&record);
        Self {
            record,
            stage,
            stage_label: stage.label(),
        }
    }
}

/// Persistence port. Loaded once when the service opens, saved after every committed mutation.
pub trait PipelineRepository: Send + Sync {
    fn load(&self) -> Result<PipelineState, RepositoryError>;
    fn save(&self, state: &PipelineState) -> Result<(), RepositoryError>;
}

/// Error enumeration for persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("pipeline store unavailable: {0}")]
    Unavailable(String),
    #[error("pipeline store is corrupt: {0}")]
    Corrupt(String),
}

/// Source of the profiles produced by CV parsing, consulted when snapshots are taken.
pub trait CandidateDirectory: Send + Sync {
    fn lookup(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, DirectoryError>;
    fn register(&self, id: CandidateId, profile: CandidateProfile) -> Result<(), DirectoryError>;
}

/// Directory lookup error.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("candidate directory unavailable: {0}")]
    Unavailable(String),
}
