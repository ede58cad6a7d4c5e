use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::domain::{
    CandidateId, CandidateProfile, DateField, FieldChange, FieldParseError, RecruitmentRecord,
};
use super::repository::{
    CandidateDirectory, DirectoryError, PipelineEntry, PipelineRepository, PipelineSnapshot,
    PipelineState, RepositoryError, SnapshotEntry,
};
use super::summary::PipelineSummary;
use super::validator::validate_change;

/// Record store composing the persistence port, candidate directory, and date validator.
///
/// State lives in memory behind a mutex. Every mutation is prepared on a copy, saved through
/// the repository, and only then swapped in, so a failed save leaves nothing half-applied.
pub struct PipelineService<R, D> {
    repository: Arc<R>,
    directory: Arc<D>,
    state: Mutex<PipelineState>,
}

impl<R, D> PipelineService<R, D>
where
    R: PipelineRepository + 'static,
    D: CandidateDirectory + 'static,
{
    /// Load the persisted pipeline and start serving it.
    pub fn open(repository: Arc<R>, directory: Arc<D>) -> Result<Self, PipelineServiceError> {
        let state = repository.load()?;
        state.verify_keys()?;
        info!(
            candidates = state.records.len(),
            snapshots = state.history.len(),
            "pipeline state loaded"
        );

        Ok(Self {
            repository,
            directory,
            state: Mutex::new(state),
        })
    }

    fn state(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().expect("pipeline state mutex poisoned")
    }

    fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut PipelineState) -> Result<T, PipelineServiceError>,
    ) -> Result<T, PipelineServiceError> {
        let mut guard = self.state();
        let mut next = guard.clone();
        let output = mutate(&mut next)?;
        self.repository.save(&next)?;
        *guard = next;
        Ok(output)
    }

    /// Put a candidate into the pipeline with every column unset.
    pub fn add_candidate(
        &self,
        candidate_id: CandidateId,
        profile: Option<CandidateProfile>,
    ) -> Result<PipelineEntry, PipelineServiceError> {
        let record = self.commit(|state| {
            if state.records.contains_key(&candidate_id) {
                return Err(PipelineServiceError::Conflict(candidate_id.clone()));
            }
            let record = RecruitmentRecord::new(candidate_id.clone());
            state.records.insert(candidate_id.clone(), record.clone());
            Ok(record)
        })?;

        // The directory only sees profiles for rows that made it into the store.
        if let Some(profile) = profile {
            if let Err(err) = self.directory.register(candidate_id.clone(), profile) {
                warn!(candidate = %candidate_id, error = %err, "profile not registered, undoing add");
                self.commit(|state| {
                    state.records.remove(&candidate_id);
                    Ok(())
                })?;
                return Err(err.into());
            }
        }

        info!(candidate = %record.candidate_id, "candidate added to pipeline");
        Ok(record.into())
    }

    /// Take a candidate out of the pipeline, returning the last state of their row.
    pub fn remove_candidate(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<RecruitmentRecord, PipelineServiceError> {
        let removed = self.commit(|state| {
            state
                .records
                .remove(candidate_id)
                .ok_or_else(|| PipelineServiceError::NotFound(candidate_id.clone()))
        })?;

        info!(candidate = %candidate_id, "candidate removed from pipeline");
        Ok(removed)
    }

    /// Dry-run an edit against the date order rules without touching the store.
    pub fn check_edit(
        &self,
        candidate_id: &CandidateId,
        change: &FieldChange,
    ) -> Result<bool, PipelineServiceError> {
        let state = self.state();
        let record = state
            .records
            .get(candidate_id)
            .ok_or_else(|| PipelineServiceError::NotFound(candidate_id.clone()))?;
        Ok(validate_change(record, change))
    }

    /// Apply a single column edit. Date edits that would break the milestone order are
    /// rejected and the record is left as it was.
    pub fn apply_edit(
        &self,
        candidate_id: &CandidateId,
        change: FieldChange,
    ) -> Result<PipelineEntry, PipelineServiceError> {
        let result = self.commit(|state| {
            let record = state
                .records
                .get_mut(candidate_id)
                .ok_or_else(|| PipelineServiceError::NotFound(candidate_id.clone()))?;

            if !validate_change(record, &change) {
                if let FieldChange::Date { field, .. } = change {
                    return Err(PipelineServiceError::DateOrderViolation { field });
                }
            }

            record.apply(change);
            Ok(record.clone())
        });

        match result {
            Ok(record) => {
                debug!(candidate = %candidate_id, field = %change.field(), "pipeline field updated");
                Ok(record.into())
            }
            Err(err @ PipelineServiceError::DateOrderViolation { .. }) => {
                warn!(candidate = %candidate_id, error = %err, "edit rejected");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Parse the UI's `(field, value)` pair and apply it.
    pub fn apply_raw_edit(
        &self,
        candidate_id: &CandidateId,
        field: &str,
        value: &str,
    ) -> Result<PipelineEntry, PipelineServiceError> {
        let change = FieldChange::parse(field, value)?;
        self.apply_edit(candidate_id, change)
    }

    pub fn get(&self, candidate_id: &CandidateId) -> Result<PipelineEntry, PipelineServiceError> {
        self.state()
            .records
            .get(candidate_id)
            .cloned()
            .map(PipelineEntry::from)
            .ok_or_else(|| PipelineServiceError::NotFound(candidate_id.clone()))
    }

    /// Current rows with their derived stages, ordered by candidate id.
    pub fn entries(&self) -> Vec<PipelineEntry> {
        self.state()
            .records
            .values()
            .cloned()
            .map(PipelineEntry::from)
            .collect()
    }

    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary::from_entries(&self.entries())
    }

    pub fn take_snapshot(&self) -> Result<PipelineSnapshot, PipelineServiceError> {
        self.take_snapshot_at(Utc::now())
    }

    /// Append a snapshot of every row plus its candidate profile to the history.
    pub fn take_snapshot_at(
        &self,
        taken_at: DateTime<Utc>,
    ) -> Result<PipelineSnapshot, PipelineServiceError> {
        let snapshot = self.commit(|state| {
            let entries = state
                .records
                .values()
                .map(|record| {
                    let profile = self.directory.lookup(&record.candidate_id)?;
                    Ok(SnapshotEntry {
                        record: record.clone(),
                        profile,
                    })
                })
                .collect::<Result<Vec<_>, DirectoryError>>()?;

            let snapshot = PipelineSnapshot {
                id: format!("snap-{:06}", state.history.len() + 1),
                taken_at,
                entries,
            };
            state.history.push(snapshot.clone());
            Ok(snapshot)
        })?;

        info!(
            snapshot = %snapshot.id,
            candidates = snapshot.entries.len(),
            "pipeline snapshot taken"
        );
        Ok(snapshot)
    }

    pub fn history(&self) -> Vec<PipelineSnapshot> {
        self.state().history.clone()
    }
}

/// Error raised by the pipeline service.
#[derive(Debug, thiserror::Error)]
pub enum PipelineServiceError {
    #[error("candidate {0} is not in the pipeline")]
    NotFound(CandidateId),
    #[error("candidate {0} is already in the pipeline")]
    Conflict(CandidateId),
    #[error("{} would break the milestone date order", .field.key())]
    DateOrderViolation { field: DateField },
    #[error(transparent)]
    InvalidEdit(#[from] FieldParseError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
