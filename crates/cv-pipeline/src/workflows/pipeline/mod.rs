//! Recruitment pipeline tracking for candidates whose CVs have been parsed.
//!
//! Each candidate in the pipeline owns one [`RecruitmentRecord`] of milestone dates and
//! interview results. Date edits are gated by the order validator, and the displayed
//! [`Stage`] is derived from the columns on every read rather than stored.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod stage;
pub mod summary;
pub mod validator;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateId, CandidateProfile, DateField, FieldChange, FieldParseError, InterviewResult,
    PipelineField, RecruitmentRecord, ResultField, Stage,
};
pub use repository::{
    CandidateDirectory, DirectoryError, PipelineEntry, PipelineRepository, PipelineSnapshot,
    PipelineState, RepositoryError, SnapshotEntry,
};
pub use router::{pipeline_router, AddCandidateRequest, FieldEditRequest};
pub use service::{PipelineService, PipelineServiceError};
pub use stage::{derive_stage, ResultTally};
pub use summary::{PipelineSummary, StageCountEntry};
pub use validator::{is_chronological, validate_date_order};
