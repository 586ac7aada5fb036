//! CLI argument parsing for the to-do service.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use todoapp::{Surface, TaskId};

#[derive(Parser)]
#[command(
    name = "todo",
    about = "A minimal to-do list service",
    version,
    after_help = "Set RUST_LOG=debug for verbose logs"
)]
pub struct Cli {
    /// Path to the SQLite task database (default: platform data directory)
    #[arg(long, global = true, env = "TODO_DB")]
    pub db: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Storage selection for `serve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// Keep tasks in memory
    Memory,
    /// Keep tasks in the SQLite database
    Sqlite,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Host to bind
        #[arg(long, env = "TODO_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to bind
        #[arg(short, long, env = "TODO_PORT", default_value = "3000")]
        port: u16,

        /// Task storage
        #[arg(short, long, env = "TODO_STORAGE", value_enum, default_value = "memory")]
        storage: StorageKind,

        /// Surface served under /tasks
        #[arg(long, env = "TODO_SURFACE", value_enum, default_value = "json")]
        surface: Surface,
    },

    /// Add a task
    Add {
        /// What needs doing (at most 20 characters)
        content: String,
    },

    /// List tasks
    List,

    /// Mark a task as done
    Done {
        /// Task ID
        id: TaskId,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: TaskId,
    },
}
