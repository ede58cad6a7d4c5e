use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{CandidateId, CandidateProfile, FieldChange};
use super::repository::{CandidateDirectory, PipelineRepository};
use super::service::{PipelineService, PipelineServiceError};

/// Request body for putting a candidate into the pipeline.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCandidateRequest {
    pub candidate_id: CandidateId,
    #[serde(default)]
    pub profile: Option<CandidateProfile>,
}

/// Request body for a single column edit, as emitted by the tracker table.
#[derive(Debug, Deserialize)]
pub struct FieldEditRequest {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

/// Router builder exposing the pipeline tracker over HTTP.
pub fn pipeline_router<R, D>(service: Arc<PipelineService<R, D>>) -> Router
where
    R: PipelineRepository + 'static,
    D: CandidateDirectory + 'static,
{
    Router::new()
        .route("/api/v1/pipeline", get(list_handler::<R, D>))
        .route("/api/v1/pipeline/summary", get(summary_handler::<R, D>))
        .route(
            "/api/v1/pipeline/candidates",
            axum::routing::post(add_handler::<R, D>),
        )
        .route(
            "/api/v1/pipeline/candidates/:candidate_id",
            get(entry_handler::<R, D>)
                .patch(edit_handler::<R, D>)
                .delete(remove_handler::<R, D>),
        )
        .route(
            "/api/v1/pipeline/candidates/:candidate_id/validate",
            axum::routing::post(validate_handler::<R, D>),
        )
        .route(
            "/api/v1/pipeline/snapshots",
            get(history_handler::<R, D>).post(snapshot_handler::<R, D>),
        )
        .with_state(service)
}

fn error_response(error: PipelineServiceError) -> Response {
    let status = match &error {
        PipelineServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        PipelineServiceError::Conflict(_) => StatusCode::CONFLICT,
        PipelineServiceError::DateOrderViolation { .. } | PipelineServiceError::InvalidEdit(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PipelineServiceError::Repository(_) | PipelineServiceError::Directory(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn list_handler<R, D>(
    State(service): State<Arc<PipelineService<R, D>>>,
) -> Response
where
    R: PipelineRepository + 'static,
    D: CandidateDirectory + 'static,
{
    (StatusCode::OK, axum::Json(service.entries())).into_response()
}

pub(crate) async fn summary_handler<R, D>(
    State(service): State<Arc<PipelineService<R, D>>>,
) -> Response
where
    R: PipelineRepository + 'static,
    D: CandidateDirectory + 'static,
{
    (StatusCode::OK, axum::Json(service.summary())).into_response()
}

pub(crate) async fn add_handler<R, D>(
    State(service): State<Arc<PipelineService<R, D>>>,
    axum::Json(request): axum::Json<AddCandidateRequest>,
) -> Response
where
    R: PipelineRepository + 'static,
    D: CandidateDirectory + 'static,
{
    match service.add_candidate(request.candidate_id, request.profile) {
        Ok(entry) => (StatusCode::CREATED, axum::Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn entry_handler<R, D>(
    State(service): State<Arc<PipelineService<R, D>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
    D: CandidateDirectory + 'static,
{
    match service.get(&CandidateId(candidate_id)) {
        Ok(entry) => (StatusCode::OK, axum::Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn edit_handler<R, D>(
    State(service): State<Arc<PipelineService<R, D>>>,
    Path(candidate_id): Path<String>,
    axum::Json(request): axum::Json<FieldEditRequest>,
) -> Response
where
    R: PipelineRepository + 'static,
    D: CandidateDirectory + 'static,
{
    let id = CandidateId(candidate_id);
    match service.apply_raw_edit(&id, &request.field, &request.value) {
        Ok(entry) => (StatusCode::OK, axum::Json(entry)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn validate_handler<R, D>(
    State(service): State<Arc<PipelineService<R, D>>>,
    Path(candidate_id): Path<String>,
    axum::Json(request): axum::Json<FieldEditRequest>,
) -> Response
where
    R: PipelineRepository + 'static,
    D: CandidateDirectory + 'static,
{
    let id = CandidateId(candidate_id);
    let checked = FieldChange::parse(&request.field, &request.value)
        .map_err(PipelineServiceError::from)
        .and_then(|change| service.check_edit(&id, &change));

    match checked {
        Ok(valid) => (StatusCode::OK, axum::Json(json!({ "valid": valid }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_handler<R, D>(
    State(service): State<Arc<PipelineService<R, D>>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: PipelineRepository + 'static,
    D: CandidateDirectory + 'static,
{
    match service.remove_candidate(&CandidateId(candidate_id)) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<R, D>(
    State(service): State<Arc<PipelineService<R, D>>>,
) -> Response
where
    R: PipelineRepository + 'static,
    D: CandidateDirectory + 'static,
{
    (StatusCode::OK, axum::Json(service.history())).into_response()
}

pub(crate) async fn snapshot_handler<R, D>(
    State(service): State<Arc<PipelineService<R, D>>>,
) -> Response
where
    R: PipelineRepository + 'static,
    D: CandidateDirectory + 'static,
{
    match service.take_snapshot() {
        Ok(snapshot) => (StatusCode::CREATED, axum::Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}
