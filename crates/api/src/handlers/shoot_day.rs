//! Handlers for shoot days and the scenes assigned to them.
//!
//! Scene assignment never double-books: a scene already on another day is
//! reported back in the outcome and left where it is. Use the move endpoint
//! to transfer it.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use clapper_core::error::CoreError;
use clapper_core::scene::validate_scene_number;
use clapper_core::scheduling::{ensure_known_scene, AssignOutcome};
use clapper_core::types::DbId;
use clapper_db::models::shoot_day::{CreateShootDay, MoveScene, ShootDay, UpdateShootDay};
use serde::Serialize;

use super::{load_project, load_shoot_day};
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of assigning a scene to a day.
#[derive(Debug, Serialize)]
pub struct AssignSceneResponse {
    pub shoot_day: ShootDay,
    pub outcome: AssignOutcome,
}

/// Both days touched by a move, after the write.
#[derive(Debug, Serialize)]
pub struct MoveSceneResponse {
    pub from: ShootDay,
    pub to: ShootDay,
}

/// GET /api/v1/projects/{id}/shoot-days
///
/// All days of a project ordered by date. Empty if the project has none.
pub async fn list_by_project(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let days = state.store.list_shoot_days(project_id).await?;
    Ok(Json(DataResponse { data: days }))
}

/// POST /api/v1/projects/{id}/shoot-days
pub async fn create(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<DbId>,
    AppJson(mut input): AppJson<CreateShootDay>,
) -> AppResult<impl IntoResponse> {
    input.project_id = project_id;
    input.check()?;

    let day = state.store.create_shoot_day(&input).await?;

    tracing::info!(
        project_id,
        shoot_day_id = day.id,
        shoot_date = %day.shoot_date,
        scene_count = day.scenes_scheduled.len(),
        "Shoot day created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: day })))
}

/// GET /api/v1/shoot-days/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let day = load_shoot_day(&state, id).await?;
    Ok(Json(DataResponse { data: day }))
}

/// PUT /api/v1/shoot-days/{id}
///
/// Edit location, call/wrap times and status. Scenes are untouched.
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateShootDay>,
) -> AppResult<impl IntoResponse> {
    input.check()?;
    let day = state
        .store
        .update_shoot_day(id, &input)
        .await?
        .ok_or_else(|| CoreError::shoot_day_not_found(id))?;

    tracing::info!(shoot_day_id = id, "Shoot day updated");

    Ok(Json(DataResponse { data: day }))
}

/// DELETE /api/v1/shoot-days/{id}
///
/// The day's scenes become unscheduled.
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if state.store.delete_shoot_day(id).await? {
        tracing::info!(shoot_day_id = id, "Shoot day deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::shoot_day_not_found(id).into())
    }
}

/// PUT /api/v1/shoot-days/{id}/scenes/{scene_number}
pub async fn assign_scene(
    State(state): State<AppState>,
    AppPath((id, scene_number)): AppPath<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    validate_scene_number(&scene_number).map_err(CoreError::Validation)?;

    let day = load_shoot_day(&state, id).await?;
    let project = load_project(&state, day.project_id).await?;
    ensure_known_scene(project.scenes(), &scene_number)?;

    let (shoot_day, outcome) = state.store.assign_scene(id, &scene_number).await?;

    match outcome {
        AssignOutcome::ScheduledElsewhere { shoot_day_id } => tracing::info!(
            shoot_day_id = id,
            scene_number = %scene_number,
            owner_shoot_day_id = shoot_day_id,
            "Scene already scheduled on another day, left in place"
        ),
        _ => tracing::info!(
            shoot_day_id = id,
            scene_number = %scene_number,
            ?outcome,
            "Scene assigned"
        ),
    }

    Ok(Json(DataResponse {
        data: AssignSceneResponse { shoot_day, outcome },
    }))
}

/// DELETE /api/v1/shoot-days/{id}/scenes/{scene_number}
///
/// No-op if the scene was not on the day.
pub async fn remove_scene(
    State(state): State<AppState>,
    AppPath((id, scene_number)): AppPath<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let day = state.store.remove_scene(id, &scene_number).await?;

    tracing::info!(
        shoot_day_id = id,
        scene_number = %scene_number,
        "Scene removed from shoot day"
    );

    Ok(Json(DataResponse { data: day }))
}

/// POST /api/v1/shoot-days/{id}/move-scene
pub async fn move_scene(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<MoveScene>,
) -> AppResult<impl IntoResponse> {
    validate_scene_number(&input.scene_number).map_err(CoreError::Validation)?;

    let (from, to) = state
        .store
        .move_scene(id, input.to_shoot_day_id, &input.scene_number)
        .await?;

    tracing::info!(
        from_shoot_day_id = id,
        to_shoot_day_id = input.to_shoot_day_id,
        scene_number = %input.scene_number,
        "Scene moved"
    );

    Ok(Json(DataResponse {
        data: MoveSceneResponse { from, to },
    }))
}
