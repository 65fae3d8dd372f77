//! Handlers for the `/projects` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use clapper_core::error::CoreError;
use clapper_core::scene::{validate_breakdown, ScriptBreakdown};
use clapper_core::types::DbId;
use clapper_db::models::project::{CreateProject, UpdateProject};

use super::load_project;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateProject>,
) -> AppResult<impl IntoResponse> {
    input.check()?;
    let project = state.store.create_project(&input).await?;

    tracing::info!(
        project_id = project.id,
        scene_count = project.scenes().len(),
        "Project created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = load_project(&state, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateProject>,
) -> AppResult<impl IntoResponse> {
    input.check()?;
    let project = state
        .store
        .update_project(id, &input)
        .await?
        .ok_or_else(|| CoreError::project_not_found(id))?;

    tracing::info!(project_id = id, "Project updated");

    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}/script-breakdown
///
/// Replace the project's scene list. Shoot days keep their scene numbers;
/// any that no longer exist show up as missing in the day breakdown.
pub async fn set_script_breakdown(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(breakdown): AppJson<ScriptBreakdown>,
) -> AppResult<impl IntoResponse> {
    validate_breakdown(&breakdown)?;
    let project = state
        .store
        .set_script_breakdown(id, &breakdown)
        .await?
        .ok_or_else(|| CoreError::project_not_found(id))?;

    tracing::info!(
        project_id = id,
        scene_count = breakdown.scenes.len(),
        "Script breakdown replaced"
    );

    Ok(Json(DataResponse { data: project }))
}

/// GET /api/v1/projects/{id}/scenes
pub async fn list_scenes(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = load_project(&state, id).await?;
    Ok(Json(DataResponse {
        data: project.scenes().to_vec(),
    }))
}
