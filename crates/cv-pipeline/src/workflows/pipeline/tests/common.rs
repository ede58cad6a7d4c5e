use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::pipeline::domain::{
    CandidateId, CandidateProfile, FieldChange, InterviewResult, RecruitmentRecord,
};
use crate::workflows::pipeline::repository::{
    CandidateDirectory, DirectoryError, PipelineRepository, PipelineState, RepositoryError,
};
use crate::workflows::pipeline::{pipeline_router, PipelineService};

pub(super) fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
}

pub(super) fn candidate(id: &str) -> CandidateId {
    CandidateId(id.to_string())
}

pub(super) fn record() -> RecruitmentRecord {
    RecruitmentRecord::new(candidate("cv-ada-lovelace"))
}

pub(super) fn record_with_results(
    first: Option<InterviewResult>,
    second: Option<InterviewResult>,
) -> RecruitmentRecord {
    let mut record = record();
    record.interview1_result = first;
    record.interview2_result = second;
    record
}

/// Row that has reached the second interview with every milestone before it filled in.
pub(super) fn progressed_record() -> RecruitmentRecord {
    let mut record = record();
    record.application_date = Some(date("2025-03-03"));
    record.interview1_date = Some(date("2025-03-10"));
    record.challenge_sent_date = Some(date("2025-03-12"));
    record.challenge_done_date = Some(date("2025-03-17"));
    record.interview2_date = Some(date("2025-03-24"));
    record
}

pub(super) fn profile(name: &str) -> CandidateProfile {
    CandidateProfile {
        name: name.to_string(),
        email: Some(format!(
            "{}@example.com",
            name.to_ascii_lowercase().replace(' ', ".")
        )),
        phone: None,
        headline: Some("Backend Engineer".to_string()),
        years_of_experience: Some(6),
        skills: vec!["Rust".to_string(), "PostgreSQL".to_string()],
    }
}

pub(super) fn date_change(field: &str, value: &str) -> FieldChange {
    FieldChange::parse(field, value).expect("well-formed change")
}

pub(super) fn build_service() -> (
    PipelineService<MemoryRepository, MemoryDirectory>,
    Arc<MemoryRepository>,
    Arc<MemoryDirectory>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let directory = Arc::new(MemoryDirectory::default());
    let service = PipelineService::open(repository.clone(), directory.clone())
        .expect("empty repository opens");
    (service, repository, directory)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) state: Arc<Mutex<PipelineState>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryRepository {
    pub(super) fn seeded(state: PipelineState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            saves: Arc::default(),
        }
    }

    pub(super) fn saves(&self) -> usize {
        *self.saves.lock().expect("save counter poisoned")
    }

    pub(super) fn persisted(&self) -> PipelineState {
        self.state.lock().expect("repository mutex poisoned").clone()
    }
}

impl PipelineRepository for MemoryRepository {
    fn load(&self) -> Result<PipelineState, RepositoryError> {
        Ok(self.persisted())
    }

    fn save(&self, state: &PipelineState) -> Result<(), RepositoryError> {
        *self.state.lock().expect("repository mutex poisoned") = state.clone();
        *self.saves.lock().expect("save counter poisoned") += 1;
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    profiles: Arc<Mutex<HashMap<CandidateId, CandidateProfile>>>,
}

impl CandidateDirectory for MemoryDirectory {
    fn lookup(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, DirectoryError> {
        Ok(self
            .profiles
            .lock()
            .expect("directory mutex poisoned")
            .get(id)
            .cloned())
    }

    fn register(&self, id: CandidateId, profile: CandidateProfile) -> Result<(), DirectoryError> {
        self.profiles
            .lock()
            .expect("directory mutex poisoned")
            .insert(id, profile);
        Ok(())
    }
}

/// Loads fine, refuses every write.
pub(super) struct ReadOnlyRepository;

impl PipelineRepository for ReadOnlyRepository {
    fn load(&self) -> Result<PipelineState, RepositoryError> {
        Ok(PipelineState::default())
    }

    fn save(&self, _state: &PipelineState) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

/// Refuses the next save, then behaves like [`MemoryRepository`].
pub(super) struct FlakyRepository {
    inner: MemoryRepository,
    fail_next: Mutex<bool>,
}

impl FlakyRepository {
    pub(super) fn failing_once() -> Self {
        Self {
            inner: MemoryRepository::default(),
            fail_next: Mutex::new(true),
        }
    }

    pub(super) fn persisted(&self) -> PipelineState {
        self.inner.persisted()
    }
}

impl PipelineRepository for FlakyRepository {
    fn load(&self) -> Result<PipelineState, RepositoryError> {
        self.inner.load()
    }

    fn save(&self, state: &PipelineState) -> Result<(), RepositoryError> {
        let mut fail_next = self.fail_next.lock().expect("flag mutex poisoned");
        if *fail_next {
            *fail_next = false;
            return Err(RepositoryError::Unavailable("write interrupted".to_string()));
        }
        self.inner.save(state)
    }
}

pub(super) struct UnavailableRepository;

impl PipelineRepository for UnavailableRepository {
    fn load(&self) -> Result<PipelineState, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn save(&self, _state: &PipelineState) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

pub(super) struct OfflineDirectory;

impl CandidateDirectory for OfflineDirectory {
    fn lookup(&self, _id: &CandidateId) -> Result<Option<CandidateProfile>, DirectoryError> {
        Err(DirectoryError::Unavailable("profile cache offline".to_string()))
    }

    fn register(&self, _id: CandidateId, _profile: CandidateProfile) -> Result<(), DirectoryError> {
        Err(DirectoryError::Unavailable("profile cache offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn pipeline_router_with_service(
    service: PipelineService<MemoryRepository, MemoryDirectory>,
) -> axum::Router {
    pipeline_router(Arc::new(service))
}
