//! Request handlers.
//!
//! Handlers validate input, delegate to the [`ScheduleStore`] in
//! [`AppState`], and map errors via [`AppError`].
//!
//! [`ScheduleStore`]: clapper_db::store::ScheduleStore
//! [`AppState`]: crate::state::AppState
//! [`AppError`]: crate::error::AppError

pub mod call_sheet;
pub mod project;
pub mod schedule;
pub mod shoot_day;

use clapper_core::error::CoreError;
use clapper_core::types::DbId;
use clapper_db::models::project::Project;
use clapper_db::models::shoot_day::ShootDay;

use crate::error::AppResult;
use crate::state::AppState;

/// Fetch a project or fail with 404.
pub(crate) async fn load_project(state: &AppState, id: DbId) -> AppResult<Project> {
    let project = state
        .store
        .find_project(id)
        .await?
        .ok_or_else(|| CoreError::project_not_found(id))?;
    Ok(project)
}

/// Fetch a shoot day or fail with 404.
pub(crate) async fn load_shoot_day(state: &AppState, id: DbId) -> AppResult<ShootDay> {
    let day = state
        .store
        .find_shoot_day(id)
        .await?
        .ok_or_else(|| CoreError::shoot_day_not_found(id))?;
    Ok(day)
}
