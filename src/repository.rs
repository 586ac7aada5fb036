//! Task repository abstraction.

use crate::types::{Task, TaskId, TaskPatch};
use eyre::Result;

/// Data access for the task collection.
///
/// Implementations own id assignment: `create` picks the next id and stores
/// the task in one step. `update` and `delete` match on `task.id` and are
/// no-ops when nothing matches; deciding whether a missing task is an error
/// is left to the caller.
pub trait TaskRepository: Send + Sync {
    /// All tasks, oldest first. Empty when there are none.
    fn find_all(&self) -> Result<Vec<Task>>;

    /// The task with the given id, if any.
    fn find_by_id(&self, id: TaskId) -> Result<Option<Task>>;

    /// Store a new, not yet done task and return it.
    fn create(&self, content: &str) -> Result<Task>;

    /// Replace the stored task with the same id.
    fn update(&self, task: &Task) -> Result<()>;

    /// Apply a patch to the stored task in one step and return the result.
    ///
    /// The read and the write are not interleaved with other writers, so
    /// concurrent patches of different fields both land. `None` when no task
    /// has the id.
    fn modify(&self, id: TaskId, patch: &TaskPatch) -> Result<Option<Task>>;

    /// Remove the stored task with the same id.
    fn delete(&self, task: &Task) -> Result<()>;
}
