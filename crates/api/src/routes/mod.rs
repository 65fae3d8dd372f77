pub mod health;
pub mod project;
pub mod shoot_day;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /projects                                       create
/// /projects/{id}                                  get, update
/// /projects/{id}/script-breakdown                 replace scene list (PUT)
/// /projects/{id}/scenes                           script scenes (GET)
/// /projects/{id}/shoot-days                       list, create
/// /projects/{id}/unscheduled-scenes               unscheduled pool (GET)
/// /projects/{id}/schedule/week?date=              week board (GET)
/// /projects/{id}/call-sheets/pending              days without a call sheet (POST)
///
/// /shoot-days/{id}                                get, update, delete
/// /shoot-days/{id}/breakdown                      running order (GET)
/// /shoot-days/{id}/scenes/{scene_number}          assign (PUT), remove (DELETE)
/// /shoot-days/{id}/move-scene                     move to another day (POST)
/// /shoot-days/{id}/call-sheet                     assemble call sheet (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/shoot-days", shoot_day::router())
}
