//! To-do list service.
//!
//! Standard CRUD over tasks. Updates are partial: fields absent from the
//! patch are left untouched, and fields that are present but malformed are
//! logged and skipped instead of failing the whole request.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use crate::core::PortalServer;
use crate::domains::services::error::{ServiceError, ServiceResult};
use crate::domains::services::extract::{JsonObject, PathSegment};
use crate::domains::services::validation::{JsonMap, parse_id, required_text};
use crate::domains::store::{Record, RecordStore};

// ============================================================================
// Model
// ============================================================================

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub done: bool,
}

impl Record for Task {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Partial update for a task. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub done: Option<bool>,
    /// Fields that were present but malformed and therefore skipped.
    pub skipped: Vec<&'static str>,
}

impl TaskPatch {
    /// Build a patch from a JSON body, keeping only well-formed fields.
    ///
    /// `text` must be a non-blank string (stored trimmed) and `done` a JSON
    /// boolean. `null` values are ignored without being reported.
    pub fn from_body(body: &JsonMap) -> Self {
        let mut patch = Self::default();

        match body.get("text") {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) if !s.trim().is_empty() => {
                patch.text = Some(s.trim().to_string());
            }
            Some(_) => patch.skipped.push("text"),
        }

        match body.get("done") {
            None | Some(Value::Null) => {}
            Some(Value::Bool(done)) => patch.done = Some(*done),
            Some(_) => patch.skipped.push("done"),
        }

        patch
    }

    fn apply(self, task: &mut Task) -> usize {
        let mut applied = 0;
        if let Some(text) = self.text {
            task.text = text;
            applied += 1;
        }
        if let Some(done) = self.done {
            task.done = done;
            applied += 1;
        }
        applied
    }
}

/// Validate the body of a task creation request, returning the task text.
pub fn validate_new_task(body: &JsonMap) -> ServiceResult<String> {
    required_text(
        body,
        "text",
        "Field 'text' is required and must be a non-empty string.",
    )
}

// ============================================================================
// Service
// ============================================================================

/// Task CRUD on top of an in-memory store.
pub struct TaskService {
    store: RecordStore<Task>,
}

impl TaskService {
    pub fn new() -> Self {
        Self {
            store: RecordStore::new(),
        }
    }

    /// Create a task with already-validated text. New tasks are not done.
    pub fn create(&self, text: String) -> ServiceResult<Task> {
        let task = self.store.insert_with(|id| Task {
            id,
            text,
            done: false,
        })?;
        info!("Created task {}", task.id);
        Ok(task)
    }

    pub fn list(&self) -> ServiceResult<Vec<Task>> {
        Ok(self.store.list(|_| true)?)
    }

    pub fn get(&self, id: u64) -> ServiceResult<Task> {
        self.store
            .get(id)?
            .ok_or_else(|| ServiceError::not_found(format!("Task with id {id} not found.")))
    }

    /// Apply a partial update. Returns the task and the number of fields
    /// that were actually changed.
    pub fn update(&self, id: u64, patch: TaskPatch) -> ServiceResult<(Task, usize)> {
        for field in &patch.skipped {
            warn!("Ignoring invalid value for '{}' while updating task {}", field, id);
        }

        self.store
            .update(id, |task| patch.apply(task))?
            .ok_or_else(|| {
                ServiceError::not_found(format!("Task with id {id} not found and cannot be updated."))
            })
    }

    pub fn delete(&self, id: u64) -> ServiceResult<()> {
        if self.store.delete(id)? {
            info!("Deleted task {}", id);
            Ok(())
        } else {
            Err(ServiceError::not_found(format!(
                "Task with id {id} not found for deletion."
            )))
        }
    }
}

impl Default for TaskService {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// HTTP handlers
// ============================================================================

/// `POST /api/tasks`
#[instrument(skip_all)]
pub async fn create_task(
    State(server): State<PortalServer>,
    JsonObject(body): JsonObject,
) -> ServiceResult<impl IntoResponse> {
    let text = validate_new_task(&body)?;
    let task = server.tasks().create(text)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Task created successfully.", "task": task })),
    ))
}

/// `GET /api/tasks`
#[instrument(skip_all)]
pub async fn list_tasks(State(server): State<PortalServer>) -> ServiceResult<impl IntoResponse> {
    let tasks = server.tasks().list()?;
    Ok(Json(json!({ "count": tasks.len(), "tasks": tasks })))
}

/// `GET /api/tasks/{id}`
#[instrument(skip(server))]
pub async fn get_task(
    State(server): State<PortalServer>,
    PathSegment(raw_id): PathSegment,
) -> ServiceResult<impl IntoResponse> {
    let id = parse_id(&raw_id, "Task")?;
    let task = server.tasks().get(id)?;
    Ok(Json(json!({ "task": task })))
}

/// `PUT /api/tasks/{id}`
///
/// The task must exist before the body is looked at, so an unknown id is a
/// 404 even when the body is malformed.
#[instrument(skip(server, body))]
pub async fn update_task(
    State(server): State<PortalServer>,
    PathSegment(raw_id): PathSegment,
    body: Result<JsonObject, ServiceError>,
) -> ServiceResult<impl IntoResponse> {
    let id = parse_id(&raw_id, "Task")?;
    server.tasks().get(id)?;
    let JsonObject(body) = body?;

    let patch = TaskPatch::from_body(&body);
    let (task, applied) = server.tasks().update(id, patch)?;

    let message = if applied == 0 && !body.is_empty() {
        "No valid fields were provided for the update.".to_string()
    } else {
        format!("Task {id} was updated successfully.")
    };

    Ok(Json(json!({ "message": message, "task": task })))
}

/// `DELETE /api/tasks/{id}`
#[instrument(skip(server))]
pub async fn delete_task(
    State(server): State<PortalServer>,
    PathSegment(raw_id): PathSegment,
) -> ServiceResult<impl IntoResponse> {
    let id = parse_id(&raw_id, "Task")?;
    server.tasks().delete(id)?;
    Ok(Json(json!({ "message": format!("Task {id} was deleted.") })))
}
