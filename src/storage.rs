//! SQLite-backed task repository.

use crate::repository::TaskRepository;
use crate::types::{Task, TaskId, TaskPatch};
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Task repository stored in a single SQLite table.
///
/// Ids come from the table's `AUTOINCREMENT` sequence, so they are never
/// reused after a delete. All access goes through one connection guarded by
/// a mutex.
pub struct SqliteTaskRepository {
    db: Mutex<Connection>,
}

impl SqliteTaskRepository {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let db = Connection::open(path).context("Failed to open SQLite database")?;
        Self::with_connection(db)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        Self::with_connection(db)
    }

    fn with_connection(db: Connection) -> Result<Self> {
        init_schema(&db)?;
        Ok(Self { db: Mutex::new(db) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db
            .lock()
            .map_err(|_| eyre::eyre!("database connection lock poisoned"))
    }

    /// Convert a database row to a Task.
    fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get(0)?,
            content: row.get(1)?,
            done: row.get(2)?,
        })
    }
}

/// Initialize SQLite schema.
fn init_schema(db: &Connection) -> Result<()> {
    db.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS task (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content TEXT NOT NULL,
            done BOOLEAN NOT NULL DEFAULT 0
        );
        "#,
    )
    .context("Failed to initialize schema")?;

    Ok(())
}

impl TaskRepository for SqliteTaskRepository {
    fn find_all(&self) -> Result<Vec<Task>> {
        let db = self.conn()?;
        let mut stmt = db.prepare("SELECT id, content, done FROM task ORDER BY id")?;
        let tasks = stmt
            .query_map([], Self::row_to_task)?
            .collect::<rusqlite::Result<Vec<Task>>>()
            .context("Failed to read tasks")?;
        Ok(tasks)
    }

    fn find_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        let db = self.conn()?;
        let task = db
            .query_row(
                "SELECT id, content, done FROM task WHERE id = ?",
                params![id],
                Self::row_to_task,
            )
            .optional()
            .context("Failed to read task")?;
        Ok(task)
    }

    fn create(&self, content: &str) -> Result<Task> {
        let db = self.conn()?;
        // RETURNING ties the generated id to this insert
        let id: TaskId = db
            .query_row(
                "INSERT INTO task (content) VALUES (?) RETURNING id",
                params![content],
                |row| row.get(0),
            )
            .context("Failed to insert task")?;
        Ok(Task::new(id, content))
    }

    fn update(&self, task: &Task) -> Result<()> {
        let db = self.conn()?;
        db.execute(
            "UPDATE task SET content = ?, done = ? WHERE id = ?",
            params![task.content, task.done, task.id],
        )
        .context("Failed to update task")?;
        Ok(())
    }

    fn modify(&self, id: TaskId, patch: &TaskPatch) -> Result<Option<Task>> {
        let db = self.conn()?;
        // NULL parameters leave the column unchanged
        let task = db
            .query_row(
                "UPDATE task SET content = COALESCE(?1, content), done = COALESCE(?2, done) \
                 WHERE id = ?3 RETURNING id, content, done",
                params![patch.content, patch.done, id],
                Self::row_to_task,
            )
            .optional()
            .context("Failed to modify task")?;
        Ok(task)
    }

    fn delete(&self, task: &Task) -> Result<()> {
        let db = self.conn()?;
        db.execute("DELETE FROM task WHERE id = ?", params![task.id])
            .context("Failed to delete task")?;
        Ok(())
    }
}
