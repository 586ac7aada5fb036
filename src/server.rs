//! HTTP server for the task list.
//!
//! The server provides:
//! - The JSON or HTML surface under `/tasks`, chosen by [`Surface`]
//! - `GET /health`
//! - Request logging and graceful shutdown on Ctrl-C or via a shutdown handle

use crate::config::{ServerConfig, Surface};
use crate::store::TaskStore;
use crate::{api, html};
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::{Json, Response};
use axum::routing::{get, post};
use axum::Router;
use eyre::{Context, Result};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: TaskStore,
}

/// Build the router for one surface.
pub fn router(store: TaskStore, surface: Surface) -> Router {
    let tasks = match surface {
        Surface::Json => Router::new()
            .route("/tasks", get(api::list_tasks).post(api::create_task))
            .route(
                "/tasks/{id}",
                get(api::get_task).patch(api::update_task).delete(api::delete_task),
            ),
        Surface::Html => Router::new()
            .route("/tasks", get(html::index).post(html::create))
            .route("/tasks/new", get(html::new_form))
            .route("/tasks/{id}", post(html::update).patch(html::update))
            .route("/tasks/{id}/edit", get(html::edit_form)),
    };

    tasks
        .route("/health", get(health))
        .layer(middleware::from_fn(log_request))
        .with_state(AppState { store })
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    log::info!("{} {} -> {}", method, path, response.status().as_u16());
    response
}

/// The task list HTTP server.
pub struct Server {
    config: ServerConfig,
    store: TaskStore,
    shutdown: Arc<Notify>,
}

impl Server {
    /// Create a server, opening the configured storage.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let repository = config.storage.open()?;
        Ok(Self::with_store(config, TaskStore::new(repository)))
    }

    /// Create a server around an existing store.
    pub fn with_store(config: ServerConfig, store: TaskStore) -> Self {
        Self {
            config,
            store,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Get a handle that stops the server when notified.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.shutdown)
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router for the configured surface.
    pub fn router(&self) -> Router {
        router(self.store.clone(), self.config.surface)
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(self) -> Result<()> {
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until shutdown.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr().context("Failed to read local address")?;
        log::info!(
            "Serving {:?} surface on http://{} ({:?} storage)",
            self.config.surface,
            local_addr,
            self.config.storage
        );

        let shutdown = Arc::clone(&self.shutdown);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => {
                        if let Err(e) = result {
                            log::error!("Failed to listen for Ctrl-C: {}", e);
                        }
                    }
                    _ = shutdown.notified() => {}
                }
                log::info!("Server shutting down");
            })
            .await
            .context("Server error")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryTaskRepository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tower::ServiceExt;

    fn make_store() -> TaskStore {
        TaskStore::new(Arc::new(InMemoryTaskRepository::new()))
    }

    #[test]
    fn test_server_keeps_config() {
        let config = ServerConfig {
            port: 0,
            surface: Surface::Html,
            ..ServerConfig::default()
        };
        let server = Server::new(config.clone()).unwrap();
        assert_eq!(server.config(), &config);
    }

    #[tokio::test]
    async fn test_health_endpoint_on_both_surfaces() {
        for surface in [Surface::Json, Surface::Html] {
            let app = router(make_store(), surface);
            let req = Request::builder().uri("/health").body(Body::empty()).unwrap();

            let resp = app.oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);

            let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
            let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(parsed["status"], "ok");
        }
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let app = router(make_store(), Surface::Json);
        let req = Request::builder().uri("/nonexistent").body(Body::empty()).unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serve_and_shutdown() {
        let server = Server::with_store(ServerConfig::default(), make_store());
        let shutdown = server.shutdown_handle();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(server.serve(listener));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /tasks HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("[]"));

        shutdown.notify_one();
        handle.await.unwrap().unwrap();
    }
}
