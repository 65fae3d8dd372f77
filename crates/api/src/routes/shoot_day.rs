//! Route definitions for the `/shoot-days` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{call_sheet, schedule, shoot_day};
use crate::state::AppState;

/// Routes mounted at `/shoot-days`.
///
/// ```text
/// GET    /{id}                          -> get_by_id
/// PUT    /{id}                          -> update
/// DELETE /{id}                          -> delete
/// GET    /{id}/breakdown                -> schedule::breakdown
/// PUT    /{id}/scenes/{scene_number}    -> assign_scene
/// DELETE /{id}/scenes/{scene_number}    -> remove_scene
/// POST   /{id}/move-scene               -> move_scene
/// POST   /{id}/call-sheet               -> call_sheet::assemble
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(shoot_day::get_by_id)
                .put(shoot_day::update)
                .delete(shoot_day::delete),
        )
        .route("/{id}/breakdown", get(schedule::breakdown))
        .route(
            "/{id}/scenes/{scene_number}",
            put(shoot_day::assign_scene).delete(shoot_day::remove_scene),
        )
        .route("/{id}/move-scene", post(shoot_day::move_scene))
        .route("/{id}/call-sheet", post(call_sheet::assemble))
}
