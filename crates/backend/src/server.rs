//! Binding and serving.

use std::future::Future;
use std::net::SocketAddr;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{router, AppState};

/// Errors starting or running the server.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("invalid frontend origin '{origin}'")]
    InvalidOrigin { origin: String },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// CORS policy admitting `frontend_origin` with credentials.
///
/// # Errors
///
/// [`ServeError::InvalidOrigin`] if the origin is not a valid header value.
pub fn cors_layer(frontend_origin: &str) -> Result<CorsLayer, ServeError> {
    let origin = HeaderValue::from_str(frontend_origin).map_err(|_| ServeError::InvalidOrigin {
        origin: frontend_origin.to_string(),
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static("x-timestamp"),
            HeaderName::from_static("x-client-version"),
        ]))
}

/// A server running on a background task.
#[derive(Debug)]
pub struct RunningBackend {
    local_addr: SocketAddr,
    task: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningBackend {
    /// The address actually bound, useful when listening on port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// `http://<local_addr>`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Waits for the server to stop.
    pub async fn wait(self) -> Result<(), ServeError> {
        self.task.await??;
        Ok(())
    }

    /// Stops the server without waiting for in-flight requests.
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Binds `listen_addr` and serves the routes until `shutdown` resolves.
///
/// # Errors
///
/// [`ServeError::InvalidOrigin`] or [`ServeError::Bind`]; errors while
/// serving surface from [`RunningBackend::wait`].
pub async fn start<F>(
    listen_addr: &str,
    state: AppState,
    frontend_origin: &str,
    shutdown: F,
) -> Result<RunningBackend, ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state, cors_layer(frontend_origin)?);

    let listener = TcpListener::bind(listen_addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: listen_addr.to_string(),
            source,
        })?;
    let local_addr = listener.local_addr()?;
    info!(%local_addr, frontend_origin, "Backend listening");

    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    });

    Ok(RunningBackend { local_addr, task })
}
