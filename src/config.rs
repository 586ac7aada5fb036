//! Server configuration.

use crate::memory::InMemoryTaskRepository;
use crate::repository::TaskRepository;
use crate::storage::SqliteTaskRepository;
use clap::ValueEnum;
use eyre::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Default bind host.
const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
const DEFAULT_PORT: u16 = 3000;

/// SQLite database file name under the data directory.
const DB_FILE: &str = "tasks.db";

/// Which HTTP surface to serve under `/tasks`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Surface {
    /// JSON REST API
    #[default]
    Json,
    /// Server-rendered HTML pages
    Html,
}

/// Where tasks are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process memory; lost on exit
    #[default]
    Memory,
    /// SQLite database file
    Sqlite(PathBuf),
}

impl StorageBackend {
    /// Open the repository this backend describes.
    pub fn open(&self) -> Result<Arc<dyn TaskRepository>> {
        match self {
            StorageBackend::Memory => Ok(Arc::new(InMemoryTaskRepository::new())),
            StorageBackend::Sqlite(path) => {
                let repo = SqliteTaskRepository::open(path)
                    .with_context(|| format!("Failed to open task database {}", path.display()))?;
                Ok(Arc::new(repo))
            }
        }
    }
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind
    pub host: String,

    /// Port to bind (0 picks a free port)
    pub port: u16,

    /// Task storage
    pub storage: StorageBackend,

    /// Served surface
    pub surface: Surface,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            storage: StorageBackend::default(),
            surface: Surface::default(),
        }
    }
}

impl ServerConfig {
    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Default location of the SQLite task database.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("todoapp")
        .join(DB_FILE)
}
