use chrono::NaiveDate;
use cv_pipeline::workflows::pipeline::{
    CandidateDirectory, CandidateId, CandidateProfile, DirectoryError, InterviewResult,
    PipelineRepository, PipelineState, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPipelineRepository {
    state: Arc<Mutex<PipelineState>>,
}

impl PipelineRepository for InMemoryPipelineRepository {
    fn load(&self) -> Result<PipelineState, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.clone())
    }

    fn save(&self, state: &PipelineState) -> Result<(), RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        *guard = state.clone();
        Ok(())
    }
}

/// Keeps the whole pipeline in one JSON document, rewritten after every mutation.
#[derive(Debug, Clone)]
pub(crate) struct JsonFilePipelineRepository {
    path: PathBuf,
}

impl JsonFilePipelineRepository {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut staged = self.path.clone().into_os_string();
        staged.push(".tmp");
        PathBuf::from(staged)
    }
}

impl PipelineRepository for JsonFilePipelineRepository {
    fn load(&self) -> Result<PipelineState, RepositoryError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no pipeline store yet, starting empty");
                return Ok(PipelineState::default());
            }
            Err(err) => return Err(RepositoryError::Unavailable(err.to_string())),
        };

        if raw.trim().is_empty() {
            return Ok(PipelineState::default());
        }

        let state: PipelineState =
            serde_json::from_str(&raw).map_err(|err| RepositoryError::Corrupt(err.to_string()))?;
        state.verify_keys()?;
        Ok(state)
    }

    fn save(&self, state: &PipelineState) -> Result<(), RepositoryError> {
        let payload = serde_json::to_vec_pretty(state)
            .map_err(|err| RepositoryError::Corrupt(err.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        }

        // Flush the staged copy to disk before it replaces the store.
        let staged = self.staging_path();
        let unavailable = |err: std::io::Error| RepositoryError::Unavailable(err.to_string());
        let mut file = fs::File::create(&staged).map_err(unavailable)?;
        file.write_all(&payload).map_err(unavailable)?;
        file.sync_all().map_err(unavailable)?;
        drop(file);
        fs::rename(&staged, &self.path).map_err(unavailable)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateDirectory {
    profiles: Arc<Mutex<HashMap<CandidateId, CandidateProfile>>>,
}

impl CandidateDirectory for InMemoryCandidateDirectory {
    fn lookup(&self, id: &CandidateId) -> Result<Option<CandidateProfile>, DirectoryError> {
        let guard = self.profiles.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn register(&self, id: CandidateId, profile: CandidateProfile) -> Result<(), DirectoryError> {
        let mut guard = self.profiles.lock().expect("directory mutex poisoned");
        guard.insert(id, profile);
        Ok(())
    }
}

/// Either persistence adapter, chosen from configuration at startup.
#[derive(Clone)]
pub(crate) enum ConfiguredRepository {
    Memory(InMemoryPipelineRepository),
    File(JsonFilePipelineRepository),
}

impl ConfiguredRepository {
    pub(crate) fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(JsonFilePipelineRepository::new(path)),
            None => Self::Memory(InMemoryPipelineRepository::default()),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "in-memory".to_string(),
            Self::File(repository) => repository.path().display().to_string(),
        }
    }
}

impl PipelineRepository for ConfiguredRepository {
    fn load(&self) -> Result<PipelineState, RepositoryError> {
        match self {
            Self::Memory(repository) => repository.load(),
            Self::File(repository) => repository.load(),
        }
    }

    fn save(&self, state: &PipelineState) -> Result<(), RepositoryError> {
        match self {
            Self::Memory(repository) => repository.save(state),
            Self::File(repository) => repository.save(state),
        }
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_result(raw: &str) -> Result<InterviewResult, String> {
    raw.parse::<InterviewResult>().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_pipeline::workflows::pipeline::RecruitmentRecord;

    fn seeded_state() -> PipelineState {
        let mut record = RecruitmentRecord::new(CandidateId("cv-7".to_string()));
        record.interview1_date = parse_date("2025-03-10").ok();
        let mut state = PipelineState::default();
        state.records.insert(record.candidate_id.clone(), record);
        state
    }

    #[test]
    fn file_repository_starts_empty_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repository = JsonFilePipelineRepository::new(dir.path().join("pipeline.json"));

        assert_eq!(repository.load().expect("loads"), PipelineState::default());
    }

    #[test]
    fn file_repository_round_trips_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repository =
            JsonFilePipelineRepository::new(dir.path().join("nested").join("pipeline.json"));
        let state = seeded_state();

        repository.save(&state).expect("saves");
        assert_eq!(repository.load().expect("loads"), state);

        let raw = fs::read_to_string(repository.path()).expect("file written");
        assert!(raw.contains("\"interview1Date\": \"2025-03-10\""));
        assert!(raw.contains("\"startDate\": \"\""));
        assert!(!repository.staging_path().exists());
    }

    #[test]
    fn file_repository_reports_corrupt_documents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pipeline.json");
        fs::write(&path, "{ not json").expect("write");

        assert!(matches!(
            JsonFilePipelineRepository::new(path).load(),
            Err(RepositoryError::Corrupt(_))
        ));
    }

    #[test]
    fn file_repository_rejects_rows_under_the_wrong_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("pipeline.json");
        let mut state = seeded_state();
        let record = state
            .records
            .remove(&CandidateId("cv-7".to_string()))
            .expect("seeded row");
        state.records.insert(CandidateId("cv-8".to_string()), record);
        fs::write(&path, serde_json::to_vec(&state).expect("serializes")).expect("write");

        match JsonFilePipelineRepository::new(path).load() {
            Err(RepositoryError::Corrupt(message)) => {
                assert!(message.contains("cv-8"));
                assert!(message.contains("cv-7"));
            }
            other => panic!("expected corrupt store, got {other:?}"),
        }
    }

    #[test]
    fn configured_repository_picks_adapter_from_path() {
        let memory = ConfiguredRepository::from_path(None);
        assert_eq!(memory.describe(), "in-memory");
        memory.save(&seeded_state()).expect("saves");
        assert_eq!(memory.load().expect("loads"), seeded_state());

        let file = ConfiguredRepository::from_path(Some(PathBuf::from("/tmp/pipeline.json")));
        assert_eq!(file.describe(), "/tmp/pipeline.json");
    }

    #[test]
    fn directory_registers_and_looks_up_profiles() {
        let directory = InMemoryCandidateDirectory::default();
        let id = CandidateId("cv-7".to_string());
        assert_eq!(directory.lookup(&id).expect("lookup"), None);

        directory
            .register(
                id.clone(),
                CandidateProfile {
                    name: "Katherine Johnson".to_string(),
                    ..CandidateProfile::default()
                },
            )
            .expect("register");
        assert_eq!(
            directory
                .lookup(&id)
                .expect("lookup")
                .map(|profile| profile.name),
            Some("Katherine Johnson".to_string())
        );
    }
}
