//! JSON REST handlers for `/tasks`.

use crate::protocol::{CreateTaskRequest, ErrorBody, parse_json_body};
use crate::server::AppState;
use crate::store::{StoreError, store_error};
use crate::types::{Task, TaskId, TaskPatch};
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error response: a status code plus a JSON [`ErrorBody`].
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody::new(code, message),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "an internal error occurred",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<eyre::Report> for ApiError {
    fn from(report: eyre::Report) -> Self {
        match store_error(&report) {
            Some(StoreError::TaskNotFound(id)) => Self::not_found(format!("task not found: {}", id)),
            Some(StoreError::Validation(e)) => Self::validation(e.to_string()),
            None => {
                log::error!("Request failed: {:#}", report);
                Self::internal()
            }
        }
    }
}

/// Parse a path id. Anything that is not a positive integer names no task.
pub fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    raw.parse::<TaskId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::not_found(format!("task not found: {}", raw)))
}

/// GET /tasks
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.store.list()?))
}

/// POST /tasks
pub async fn create_task(State(state): State<AppState>, body: Bytes) -> Result<(StatusCode, Json<Task>), ApiError> {
    let request: CreateTaskRequest = parse_json_body(&body)
        .ok_or_else(|| ApiError::bad_request("expected a JSON object with a string `content`"))?;

    let task = state.store.create(&request.content)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks/{id}
pub async fn get_task(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&id)?;
    state
        .store
        .get(id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("task not found: {}", id)))
}

/// PATCH /tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let patch: TaskPatch = parse_json_body(&body)
        .ok_or_else(|| ApiError::bad_request("expected a JSON object with optional `content` and `done`"))?;
    let id = parse_task_id(&id)?;

    state.store.update(id, &patch)?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /tasks/{id}
pub async fn delete_task(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_task_id(&id)?;
    state.store.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
