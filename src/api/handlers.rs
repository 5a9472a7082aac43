//! API Handlers
//!
//! HTTP request handlers for each todo service endpoint.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info, warn};

use crate::cache::{list_cache_key, ListCache, LIST_CACHE_KEYS, LIST_CACHE_TTL_SECS};
use crate::error::{AppError, Result};
use crate::models::{
    CreateTodoRequest, DeleteResponse, HealthResponse, ListTodosQuery, Todo, UpdateTodoRequest,
};
use crate::store::TodoStore;

/// Todo id from the path; a non-numeric id is reported as not found.
type TodoId = std::result::Result<Path<i64>, PathRejection>;

/// Application state shared across all handlers.
///
/// Holds the injected store and cache; the service keeps no other state
/// between requests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub cache: Arc<dyn ListCache>,
}

impl AppState {
    /// Creates a new AppState from a store and a cache.
    pub fn new(store: impl TodoStore + 'static, cache: impl ListCache + 'static) -> Self {
        Self {
            store: Arc::new(store),
            cache: Arc::new(cache),
        }
    }

    /// Drops every list-cache entry. Failures are logged, not returned: the
    /// mutation has already been committed.
    async fn invalidate_lists(&self) {
        match self.cache.delete(&LIST_CACHE_KEYS).await {
            Ok(()) => debug!("List cache invalidated"),
            Err(e) => warn!("Failed to invalidate list cache: {}", e),
        }
    }
}

/// Handler for GET /health
///
/// Probes the store and cache independently. Never fails; an unreachable
/// dependency is reported in the body with a 503 status.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Database health check failed: {}", e);
            false
        }
    };
    let redis_ok = match state.cache.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Redis health check failed: {}", e);
            false
        }
    };

    let health = HealthResponse::from_probes(database_ok, redis_ok);
    let status = if health.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(health))
}

/// Handler for GET /api/todos
///
/// Serves the cached list for the filter when present, otherwise reads the
/// store and populates the cache on a best-effort basis.
pub async fn list_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response> {
    let Query(pairs) = query?;
    let filter = ListTodosQuery::from_pairs(pairs).filter();
    let key = list_cache_key(filter);

    match state.cache.get(key).await {
        Ok(Some(cached)) => {
            debug!("List cache hit for {}", key);
            return Ok(json_text(cached));
        }
        Ok(None) => debug!("List cache miss for {}", key),
        Err(e) => warn!("List cache read failed for {}: {}", key, e),
    }

    let todos = state.store.list(filter).await?;
    let body = serde_json::to_string(&todos)?;

    if let Err(e) = state.cache.set_ex(key, &body, LIST_CACHE_TTL_SECS).await {
        warn!("Failed to populate list cache for {}: {}", key, e);
    }

    Ok(json_text(body))
}

/// Handler for GET /api/todos/:id
pub async fn get_handler(
    State(state): State<AppState>,
    id: TodoId,
) -> Result<Json<Todo>> {
    let Path(id) = id?;
    let todo = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::todo_not_found(id))?;
    Ok(Json(todo))
}

/// Handler for POST /api/todos
pub async fn create_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>)> {
    let Json(req) = payload?;
    let new = req.into_new_todo().map_err(AppError::InvalidRequest)?;

    let todo = state.store.create(new).await?;
    info!("Created todo {}", todo.id);
    state.invalidate_lists().await;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// Handler for PUT /api/todos/:id
///
/// Applies only the fields present in the body. An unknown id is reported
/// before the body is validated.
pub async fn update_handler(
    State(state): State<AppState>,
    id: TodoId,
    payload: std::result::Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<Todo>> {
    let Path(id) = id?;
    if state.store.get(id).await?.is_none() {
        return Err(AppError::todo_not_found(id));
    }

    let Json(req) = payload?;
    let patch = req.into_patch().map_err(AppError::InvalidRequest)?;

    let todo = state
        .store
        .update(id, patch)
        .await?
        .ok_or_else(|| AppError::todo_not_found(id))?;
    info!("Updated todo {}", id);
    state.invalidate_lists().await;

    Ok(Json(todo))
}

/// Handler for DELETE /api/todos/:id
pub async fn delete_handler(
    State(state): State<AppState>,
    id: TodoId,
) -> Result<Json<DeleteResponse>> {
    let Path(id) = id?;
    if !state.store.delete(id).await? {
        return Err(AppError::todo_not_found(id));
    }
    info!("Deleted todo {}", id);
    state.invalidate_lists().await;

    Ok(Json(DeleteResponse::deleted()))
}

/// Handler for POST /api/todos/:id/toggle
pub async fn toggle_handler(
    State(state): State<AppState>,
    id: TodoId,
) -> Result<Json<Todo>> {
    let Path(id) = id?;
    let todo = state
        .store
        .toggle(id)
        .await?
        .ok_or_else(|| AppError::todo_not_found(id))?;
    info!("Toggled todo {} to completed={}", id, todo.completed);
    state.invalidate_lists().await;

    Ok(Json(todo))
}

/// Wraps pre-serialized JSON text in a response.
fn json_text(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
