//! Publishing server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use kiji_publish::{Publisher, PublisherConfig};
use tokio::sync::Mutex;
use tower_http::services::ServeDir;

use crate::api::{create_article, health};

/// Configuration for the publishing server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Largest accepted request body, in bytes
    pub body_limit: usize,

    /// Open the article form in a browser on start
    pub open: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            body_limit: 10 * 1024 * 1024,
            open: false,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Server error: {0}")]
    ServeError(String),
}

/// Shared server state.
pub struct ServerState {
    pub publisher: Arc<Publisher>,

    /// Serializes publishes made through this server. The guard travels with
    /// the blocking publish, so a dropped request still holds it until the
    /// files are written. Other processes writing the same listing page are not
    /// covered.
    pub publish_lock: Arc<Mutex<()>>,
}

impl ServerState {
    pub fn new(publisher: Publisher) -> Self {
        Self {
            publisher: Arc::new(publisher),
            publish_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Build the application router.
pub fn router(state: Arc<ServerState>, body_limit: usize) -> Router {
    let site_root = state.publisher.config().root.clone();

    Router::new()
        .route("/api/articles", post(create_article))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(site_root))
        .layer(middleware::from_fn(hide_private_files))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Keep config files and dot files under the site root from being served.
async fn hide_private_files(req: Request<Body>, next: Next) -> Response {
    if is_private_path(req.uri().path()) {
        tracing::debug!("Refusing to serve {}", req.uri().path());
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(req).await
}

fn is_private_path(path: &str) -> bool {
    let path = path.to_ascii_lowercase().replace("%2e", ".");
    path.ends_with(".toml")
        || path
            .split('/')
            .any(|segment| segment.starts_with('.') && !segment.is_empty())
}

/// Publishing server.
pub struct PublishServer {
    config: ServerConfig,
    publisher: PublisherConfig,
}

impl PublishServer {
    /// Create a new publishing server.
    pub fn new(config: ServerConfig, publisher: PublisherConfig) -> Self {
        Self { config, publisher }
    }

    /// Start the server and run until Ctrl-C.
    pub async fn start(self) -> Result<(), ServerError> {
        let raw_addr = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = raw_addr
            .parse()
            .map_err(|_| ServerError::InvalidAddress(raw_addr.clone()))?;

        let site_root = self.publisher.root.clone();
        let state = Arc::new(ServerState::new(Publisher::new(self.publisher)));
        let app = router(state, self.config.body_limit);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        let url = format!("http://{}", addr);
        tracing::info!("Serving {} at {}", site_root.display(), url);
        tracing::info!("Article form: {}/admin.html", url);

        if self.config.open {
            let _ = open::that(format!("{}/admin.html", url));
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_server_with_default_config() {
        let server = PublishServer::new(ServerConfig::default(), PublisherConfig::default());

        assert_eq!(server.config.port, 3000);
        assert_eq!(server.config.body_limit, 10 * 1024 * 1024);
    }

    #[test]
    fn hides_config_and_dot_files() {
        assert!(is_private_path("/kiji.toml"));
        assert!(is_private_path("/KIJI.TOML"));
        assert!(is_private_path("/kiji%2Etoml"));
        assert!(is_private_path("/.env"));
        assert!(is_private_path("/.git/config"));
        assert!(!is_private_path("/column.html"));
        assert!(!is_private_path("/articles/テスト記事.html"));
        assert!(!is_private_path("/api/articles"));
        assert!(!is_private_path("/"));
    }

    #[tokio::test]
    async fn rejects_invalid_host() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..Default::default()
        };

        let result = PublishServer::new(config, PublisherConfig::default())
            .start()
            .await;

        assert!(matches!(result, Err(ServerError::InvalidAddress(_))));
    }
}
