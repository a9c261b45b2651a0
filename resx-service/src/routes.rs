//! HTTP routes for the workflow host
//!
//! The host only serves metadata and execution endpoints; step input
//! UIs are rendered by whatever client consumes these routes.

use std::collections::HashMap;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use resx_workflows::{StepResult, WorkflowDefinition, WorkflowRunResult};

use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

/// Build the full router for the host
pub fn create_router(state: AppState, cors: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/api/workflows", get(list_workflows))
        .route("/api/workflows/:id", get(get_workflow))
        .route("/api/workflows/:id/run", post(run_workflow))
        .route("/api/workflows/:id/steps/:step_id", post(run_step))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

fn not_found(what: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("{} not found", what) })),
    )
}

fn internal(err: anyhow::Error) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_workflows(State(state): State<AppState>) -> Json<Vec<WorkflowDefinition>> {
    Json(state.registry.list_definitions().await)
}

async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowDefinition>, ApiError> {
    state
        .registry
        .get_definition(&id)
        .await
        .map(Json)
        .ok_or_else(|| not_found("Workflow"))
}

async fn run_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<HashMap<String, Value>>>,
) -> Result<Json<WorkflowRunResult>, ApiError> {
    if state.registry.get_definition(&id).await.is_none() {
        return Err(not_found("Workflow"));
    }

    let inputs = body.map(|Json(inputs)| inputs).unwrap_or_default();
    state
        .registry
        .run(&id, inputs)
        .await
        .map(Json)
        .map_err(internal)
}

async fn run_step(
    State(state): State<AppState>,
    Path((id, step_id)): Path<(String, String)>,
    body: Option<Json<HashMap<String, Value>>>,
) -> Result<Json<StepResult>, ApiError> {
    let Some(definition) = state.registry.get_definition(&id).await else {
        return Err(not_found("Workflow"));
    };
    if !definition.has_step(&step_id) {
        return Err(not_found("Step"));
    }

    let inputs = body.map(|Json(inputs)| inputs).unwrap_or_default();
    state
        .registry
        .run_step(&id, &step_id, inputs)
        .await
        .map(Json)
        .map_err(internal)
}
