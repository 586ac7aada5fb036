//! todo CLI - run the task server or edit the task database directly.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use todoapp::{
    Server, ServerConfig, SqliteTaskRepository, StorageBackend, Task, TaskPatch, TaskStore, config::default_db_path,
};

mod cli;

use cli::{Cli, Command, StorageKind};

fn setup_logging(log_file: Option<&Path>, default_level: &str) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));

    if let Some(log_file) = log_file {
        if let Some(parent) = log_file.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create log directory")?;
        }

        let target = Box::new(
            fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .context("Failed to open log file")?,
        );
        builder.target(env_logger::Target::Pipe(target));
    }

    builder.init();
    Ok(())
}

fn db_path(cli: &Cli) -> PathBuf {
    cli.db.clone().unwrap_or_else(default_db_path)
}

fn open_local_store(path: &Path) -> Result<TaskStore> {
    let repo = SqliteTaskRepository::open(path).context("Failed to open task database")?;
    Ok(TaskStore::new(Arc::new(repo)))
}

fn format_task(task: &Task) -> String {
    let mark = if task.done { "[x]".green() } else { "[ ]".dimmed() };
    format!("{} {} {}", mark, task.id.to_string().cyan(), task.content)
}

fn run(cli: Cli) -> Result<()> {
    let db = db_path(&cli);

    match cli.command {
        Command::Serve {
            host,
            port,
            storage,
            surface,
        } => {
            let storage = match storage {
                StorageKind::Memory => StorageBackend::Memory,
                StorageKind::Sqlite => StorageBackend::Sqlite(db),
            };
            let config = ServerConfig {
                host,
                port,
                storage,
                surface,
            };
            let server = Server::new(config).context("Failed to create server")?;

            let rt = tokio::runtime::Runtime::new().context("Failed to create runtime")?;
            rt.block_on(server.run()).context("Server error")?;
        }

        Command::Add { content } => {
            let store = open_local_store(&db)?;
            let task = store.create(&content).context("Failed to create task")?;
            println!("{} Created: {}", "✓".green(), format_task(&task));
        }

        Command::List => {
            let store = open_local_store(&db)?;
            let tasks = store.list().context("Failed to list tasks")?;

            if tasks.is_empty() {
                println!("{}", "No tasks".dimmed());
            } else {
                for task in &tasks {
                    println!("{}", format_task(task));
                }
            }
        }

        Command::Done { id } => {
            let store = open_local_store(&db)?;
            let task = store
                .update(id, &TaskPatch::default().done(true))
                .context("Failed to mark task done")?;
            println!("{} Done: {}", "✓".green(), format_task(&task));
        }

        Command::Rm { id } => {
            let store = open_local_store(&db)?;
            let task = store.delete(id).context("Failed to delete task")?;
            println!("{} Deleted: {} {}", "✓".green(), task.id.to_string().cyan(), task.content);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // The server reports requests; one-shot commands stay quiet unless RUST_LOG says otherwise
    let default_level = match cli.command {
        Command::Serve { .. } => "info",
        _ => "warn",
    };
    setup_logging(cli.log_file.as_deref(), default_level).context("Failed to setup logging")?;
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
