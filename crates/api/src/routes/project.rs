//! Route definitions for the `/projects` resource.
//!
//! Project-scoped shoot day and schedule views are mounted here too.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{call_sheet, project, schedule, shoot_day};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST   /                              -> create
/// GET    /{id}                          -> get_by_id
/// PUT    /{id}                          -> update
/// PUT    /{id}/script-breakdown         -> set_script_breakdown
/// GET    /{id}/scenes                   -> list_scenes
/// GET    /{id}/shoot-days               -> shoot_day::list_by_project
/// POST   /{id}/shoot-days               -> shoot_day::create
/// GET    /{id}/unscheduled-scenes       -> schedule::unscheduled_scenes
/// GET    /{id}/schedule/week            -> schedule::week
/// POST   /{id}/call-sheets/pending      -> call_sheet::pending
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(project::create))
        .route("/{id}", get(project::get_by_id).put(project::update))
        .route("/{id}/script-breakdown", put(project::set_script_breakdown))
        .route("/{id}/scenes", get(project::list_scenes))
        .route(
            "/{id}/shoot-days",
            get(shoot_day::list_by_project).post(shoot_day::create),
        )
        .route("/{id}/unscheduled-scenes", get(schedule::unscheduled_scenes))
        .route("/{id}/schedule/week", get(schedule::week))
        .route("/{id}/call-sheets/pending", post(call_sheet::pending))
}
