//! In-memory task repository.

use crate::repository::TaskRepository;
use crate::types::{Task, TaskId, TaskPatch};
use eyre::Result;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct TaskList {
    tasks: Vec<Task>,
    /// Highest id ever handed out; survives deletion so ids are never reused.
    last_id: TaskId,
}

/// Task repository backed by an ordered list.
///
/// The list and the id counter share one lock, so assigning an id and
/// appending the task happen together. Contents are lost when dropped.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    inner: Mutex<TaskList>,
}

impl InMemoryTaskRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, TaskList>> {
        self.inner
            .lock()
            .map_err(|_| eyre::eyre!("task list lock poisoned"))
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn find_all(&self) -> Result<Vec<Task>> {
        Ok(self.lock()?.tasks.clone())
    }

    fn find_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.lock()?.tasks.iter().find(|t| t.id == id).cloned())
    }

    fn create(&self, content: &str) -> Result<Task> {
        let mut list = self.lock()?;
        list.last_id += 1;
        let task = Task::new(list.last_id, content);
        list.tasks.push(task.clone());
        Ok(task)
    }

    fn update(&self, task: &Task) -> Result<()> {
        let mut list = self.lock()?;
        if let Some(slot) = list.tasks.iter_mut().find(|t| t.id == task.id) {
            *slot = task.clone();
        }
        Ok(())
    }

    fn modify(&self, id: TaskId, patch: &TaskPatch) -> Result<Option<Task>> {
        let mut list = self.lock()?;
        Ok(list.tasks.iter_mut().find(|t| t.id == id).map(|slot| {
            *slot = slot.patched(patch);
            slot.clone()
        }))
    }

    fn delete(&self, task: &Task) -> Result<()> {
        self.lock()?.tasks.retain(|t| t.id != task.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let repo = InMemoryTaskRepository::new();
        let ids: Vec<TaskId> = ["a", "b", "a"]
            .iter()
            .map(|c| repo.create(c).unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_find_all_keeps_insertion_order() {
        let repo = InMemoryTaskRepository::new();
        repo.create("first").unwrap();
        repo.create("second").unwrap();

        let contents: Vec<String> = repo.find_all().unwrap().into_iter().map(|t| t.content).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[test]
    fn test_deleted_id_not_reused() {
        let repo = InMemoryTaskRepository::new();
        repo.create("one").unwrap();
        let two = repo.create("two").unwrap();
        repo.delete(&two).unwrap();

        let next = repo.create("three").unwrap();
        assert_eq!(next.id, 3);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let repo = InMemoryTaskRepository::new();
        let task = repo.create("keep").unwrap();

        repo.update(&Task::new(99, "ghost")).unwrap();

        assert_eq!(repo.find_all().unwrap(), vec![task]);
    }

    #[test]
    fn test_modify_keeps_omitted_fields() {
        let repo = InMemoryTaskRepository::new();
        let task = repo.create("x").unwrap();

        let done = repo.modify(task.id, &TaskPatch::default().done(true)).unwrap();
        assert_eq!(done, Some(Task { id: 1, content: "x".into(), done: true }));
        assert_eq!(repo.modify(99, &TaskPatch::default().done(true)).unwrap(), None);
    }

    #[test]
    fn test_concurrent_create_assigns_unique_ids() {
        let repo = Arc::new(InMemoryTaskRepository::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || {
                    (0..50).map(|_| repo.create("task").unwrap().id).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<TaskId> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=400).collect::<Vec<_>>());
    }
}
