//! A minimal to-do list service.
//!
//! Tasks live in a [`TaskRepository`], either in memory or in SQLite, and are
//! served over HTTP as a JSON API or as server-rendered HTML pages.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use todoapp::{InMemoryTaskRepository, TaskPatch, TaskStore};
//!
//! let store = TaskStore::new(Arc::new(InMemoryTaskRepository::new()));
//!
//! let task = store.create("buy milk").unwrap();
//! assert_eq!(task.id, 1);
//!
//! let task = store.update(task.id, &TaskPatch::default().done(true)).unwrap();
//! assert!(task.done);
//!
//! store.delete(task.id).unwrap();
//! assert!(store.list().unwrap().is_empty());
//! ```

mod memory;
mod repository;
mod storage;
mod store;
mod types;

pub mod api;
pub mod config;
pub mod html;
pub mod protocol;
pub mod server;

// Re-export public API
pub use config::{ServerConfig, StorageBackend, Surface};
pub use memory::InMemoryTaskRepository;
pub use repository::TaskRepository;
pub use server::{AppState, Server, router};
pub use storage::SqliteTaskRepository;
pub use store::{StoreError, TaskStore, store_error};
pub use types::{MAX_CONTENT_LEN, Task, TaskId, TaskPatch, ValidationError, parse_flag, validate_content};
