//! High-level task store API.

use crate::repository::TaskRepository;
use crate::types::{Task, TaskId, TaskPatch, ValidationError, validate_content};
use eyre::{Context, Result};
use std::sync::Arc;

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Task not found.
    TaskNotFound(TaskId),
    /// Validation error.
    Validation(ValidationError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::TaskNotFound(id) => write!(f, "task not found: {}", id),
            StoreError::Validation(e) => write!(f, "validation error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Validating front door to a task repository.
///
/// Cheap to clone; clones share the same repository.
#[derive(Clone)]
pub struct TaskStore {
    repository: Arc<dyn TaskRepository>,
}

impl TaskStore {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// List all tasks.
    pub fn list(&self) -> Result<Vec<Task>> {
        self.repository.find_all()
    }

    /// Get a task by ID.
    pub fn get(&self, id: TaskId) -> Result<Option<Task>> {
        self.repository.find_by_id(id)
    }

    /// Create a new task.
    pub fn create(&self, content: &str) -> Result<Task> {
        validate_content(content).map_err(|e| eyre::eyre!(StoreError::Validation(e)))?;

        let task = self
            .repository
            .create(content)
            .context("Failed to persist task")?;
        log::debug!("Created task {}", task.id);
        Ok(task)
    }

    /// Update a task's fields. Omitted fields keep their current value.
    ///
    /// The lookup and the write happen in one repository call, so a task
    /// deleted concurrently is reported as not found.
    pub fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        // Validate before touching the repository
        patch
            .validate()
            .map_err(|e| eyre::eyre!(StoreError::Validation(e)))?;

        let updated = self
            .repository
            .modify(id, patch)
            .context("Failed to persist updated task")?
            .ok_or_else(|| eyre::eyre!(StoreError::TaskNotFound(id)))?;
        log::debug!("Updated task {}", id);
        Ok(updated)
    }

    /// Delete a task.
    pub fn delete(&self, id: TaskId) -> Result<Task> {
        let existing = self.require(id)?;

        self.repository
            .delete(&existing)
            .context("Failed to delete task")?;
        log::debug!("Deleted task {}", id);
        Ok(existing)
    }

    fn require(&self, id: TaskId) -> Result<Task> {
        self.repository
            .find_by_id(id)?
            .ok_or_else(|| eyre::eyre!(StoreError::TaskNotFound(id)))
    }
}

/// Extract the store error carried by a report, if there is one.
pub fn store_error(report: &eyre::Report) -> Option<&StoreError> {
    report.downcast_ref::<StoreError>()
}
