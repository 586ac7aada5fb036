//! Core data types for the task list.

use serde::{Deserialize, Serialize};

/// Task identifier. Always positive once assigned.
pub type TaskId = i64;

/// Maximum content length in characters.
pub const MAX_CONTENT_LEN: usize = 20;

/// A single to-do item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier, assigned by the repository
    pub id: TaskId,

    /// What needs doing
    pub content: String,

    /// Whether the task has been completed
    pub done: bool,
}

impl Task {
    /// Create a task that has not been completed yet.
    pub fn new(id: TaskId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            done: false,
        }
    }

    /// Apply a patch, keeping the current value of every omitted field.
    pub fn patched(&self, patch: &TaskPatch) -> Task {
        Task {
            id: self.id,
            content: patch.content.clone().unwrap_or_else(|| self.content.clone()),
            done: patch.done.unwrap_or(self.done),
        }
    }
}

/// Partial update for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub done: Option<bool>,
}

impl TaskPatch {
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn done(mut self, done: bool) -> Self {
        self.done = Some(done);
        self
    }

    /// Validate the fields that are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.content {
            Some(content) => validate_content(content),
            None => Ok(()),
        }
    }
}

/// Validation errors for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyContent,
    ContentTooLong,
    /// A `done` form value that is not a recognised boolean.
    InvalidDone(String),
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyContent | ValidationError::ContentTooLong => "content",
            ValidationError::InvalidDone(_) => "done",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyContent => write!(f, "content is required"),
            ValidationError::ContentTooLong => {
                write!(f, "content must be at most {} characters", MAX_CONTENT_LEN)
            }
            ValidationError::InvalidDone(value) => write!(f, "done must be true or false, got {:?}", value),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check task content: required, not blank, at most 20 characters.
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(ValidationError::ContentTooLong);
    }
    Ok(())
}

/// Parse a submitted boolean flag.
///
/// Accepts `true`/`on`/`yes`/`1` and `false`/`off`/`no`/`0`, ignoring case.
pub fn parse_flag(value: &str) -> Result<bool, ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(ValidationError::InvalidDone(value.to_string())),
    }
}
