//! Shared test infrastructure for todoapp integration tests.
//!
//! Provides repository factories for both storage variants and a TestEnv
//! helper that drives the router in-process.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use std::sync::Arc;
use tempfile::TempDir;
use todoapp::{
    InMemoryTaskRepository, SqliteTaskRepository, Surface, Task, TaskId, TaskPatch, TaskRepository, TaskStore, router,
};
use tower::ServiceExt;

/// A repository plus whatever keeps it alive.
pub struct RepoFixture {
    pub name: &'static str,
    pub repo: Arc<dyn TaskRepository>,
    _temp_dir: Option<TempDir>,
}

/// One fresh, empty repository of each variant.
pub fn all_repositories() -> Vec<RepoFixture> {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let sqlite = SqliteTaskRepository::open(&temp_dir.path().join("tasks.db")).expect("Failed to open database");

    vec![
        RepoFixture {
            name: "memory",
            repo: Arc::new(InMemoryTaskRepository::new()),
            _temp_dir: None,
        },
        RepoFixture {
            name: "sqlite",
            repo: Arc::new(sqlite),
            _temp_dir: Some(temp_dir),
        },
    ]
}

/// Detail carried by every `FailingRepository` error.
pub const STORAGE_FAILURE: &str = "disk I/O error in /var/lib/todo/tasks.db";

/// Repository whose every call fails, standing in for a broken backing store.
pub struct FailingRepository;

impl TaskRepository for FailingRepository {
    fn find_all(&self) -> eyre::Result<Vec<Task>> {
        eyre::bail!(STORAGE_FAILURE)
    }

    fn find_by_id(&self, _id: TaskId) -> eyre::Result<Option<Task>> {
        eyre::bail!(STORAGE_FAILURE)
    }

    fn create(&self, _content: &str) -> eyre::Result<Task> {
        eyre::bail!(STORAGE_FAILURE)
    }

    fn update(&self, _task: &Task) -> eyre::Result<()> {
        eyre::bail!(STORAGE_FAILURE)
    }

    fn modify(&self, _id: TaskId, _patch: &TaskPatch) -> eyre::Result<Option<Task>> {
        eyre::bail!(STORAGE_FAILURE)
    }

    fn delete(&self, _task: &Task) -> eyre::Result<()> {
        eyre::bail!(STORAGE_FAILURE)
    }
}

/// Response captured from the router.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("Response body is not JSON ({}): {}", e, self.body))
    }
}

/// Test environment with an in-memory store behind one surface.
pub struct TestEnv {
    pub store: TaskStore,
    app: Router,
}

impl TestEnv {
    /// JSON surface over an in-memory repository.
    pub fn json() -> Self {
        Self::with_repo(Arc::new(InMemoryTaskRepository::new()), Surface::Json)
    }

    /// HTML surface over an in-memory repository.
    pub fn html() -> Self {
        Self::with_repo(Arc::new(InMemoryTaskRepository::new()), Surface::Html)
    }

    pub fn with_repo(repo: Arc<dyn TaskRepository>, surface: Surface) -> Self {
        let store = TaskStore::new(repo);
        let app = router(store.clone(), surface);
        Self { store, app }
    }

    /// Send a request with an optional body and content type.
    pub async fn send(&self, method: Method, uri: &str, content_type: Option<&str>, body: &str) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = axum::body::to_bytes(response.into_body(), 1_000_000)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8"),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, "").await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, "").await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some("application/json"), body).await
    }

    pub async fn patch_json(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::PATCH, uri, Some("application/json"), body).await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some("application/x-www-form-urlencoded"), body)
            .await
    }

    pub async fn patch_form(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::PATCH, uri, Some("application/x-www-form-urlencoded"), body)
            .await
    }

    /// Number of stored tasks.
    pub fn task_count(&self) -> usize {
        self.store.list().expect("Failed to list tasks").len()
    }
}
