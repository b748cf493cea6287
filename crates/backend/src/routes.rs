//! HTTP routes and the bearer guard.
//!
//! ```text
//! POST /auth/login          open
//! GET  /auth/profile        guarded
//! GET  /query/categories    guarded
//! GET  /query/statuses      guarded
//! GET  /query/types         guarded
//! GET  /query/search        guarded   ?category&status&type
//! POST /query/test-data     guarded   { num }
//! ```

use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use domain::{LoginResponse, QueryFilter, QueryRecord, RawUser};

use crate::auth::SessionStore;
use crate::error::BackendError;
use crate::store::QueryStore;

/// Shared state behind every handler.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub store: Arc<QueryStore>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Fresh fixture data and no sessions.
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct TestDataRequest {
    num: i64,
}

/// Builds the application router.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let guarded = Router::new()
        .route("/auth/profile", get(profile))
        .route("/query/categories", get(categories))
        .route("/query/statuses", get(statuses))
        .route("/query/types", get(types))
        .route("/query/search", get(search))
        .route("/query/test-data", post(test_data))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/auth/login", post(login))
        .merge(guarded)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Resolves the bearer token to a user and stores it as a request extension.
async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| BackendError::Unauthorized("Unauthorized".into()))?;

    let user = state
        .sessions
        .user_for(token)
        .await
        .ok_or_else(|| BackendError::Unauthorized("Unauthorized".into()))?;

    debug!(user_id = %user.id, path = %request.uri().path(), "Session accepted");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), BackendError> {
    let response = state.sessions.login(&body.username, &body.password).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn profile(Extension(user): Extension<RawUser>) -> Json<RawUser> {
    Json(user)
}

async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.store.categories())
}

async fn statuses(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.store.statuses())
}

async fn types(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.store.types())
}

async fn search(
    State(state): State<AppState>,
    Query(filter): Query<QueryFilter>,
) -> Json<Vec<QueryRecord>> {
    Json(state.store.search(&filter).await)
}

async fn test_data(
    State(state): State<AppState>,
    Json(body): Json<TestDataRequest>,
) -> Result<(StatusCode, Json<Vec<QueryRecord>>), BackendError> {
    let snapshot = state.store.append_test_record(body.num).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}
