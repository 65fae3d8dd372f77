//! Read-only schedule views: the unscheduled pool, the week board and the
//! per-day running order.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use clapper_core::breakdown::{build_day_breakdown, DayBreakdown};
use clapper_core::scene::Scene;
use clapper_core::scheduling::{list_unscheduled, week_of};
use clapper_core::types::{DbId, ShootDate};
use clapper_db::models::shoot_day::ShootDay;
use serde::{Deserialize, Serialize};

use super::{load_project, load_shoot_day};
use crate::error::AppResult;
use crate::extract::{AppPath, AppQuery};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the week board.
#[derive(Debug, Deserialize)]
pub struct WeekParams {
    /// Any date inside the wanted week. Defaults to today (UTC).
    pub date: Option<ShootDate>,
}

/// One column of the week board.
#[derive(Debug, Serialize)]
pub struct WeekSlot {
    pub date: ShootDate,
    pub shoot_day: Option<ShootDay>,
}

#[derive(Debug, Serialize)]
pub struct WeekSchedule {
    pub week_start: ShootDate,
    pub days: Vec<WeekSlot>,
}

#[derive(Debug, Serialize)]
pub struct ShootDayBreakdown {
    pub shoot_day_id: DbId,
    pub shoot_date: ShootDate,
    #[serde(flatten)]
    pub breakdown: DayBreakdown,
}

/// GET /api/v1/projects/{id}/unscheduled-scenes
///
/// Script scenes on no shoot day, in script order.
pub async fn unscheduled_scenes(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = load_project(&state, project_id).await?;
    let days = state.store.list_shoot_days(project_id).await?;

    let scenes: Vec<Scene> = list_unscheduled(project.scenes(), &days)
        .into_iter()
        .cloned()
        .collect();

    tracing::debug!(
        project_id,
        unscheduled = scenes.len(),
        total = project.scenes().len(),
        "Listed unscheduled scenes"
    );

    Ok(Json(DataResponse { data: scenes }))
}

/// GET /api/v1/projects/{id}/schedule/week?date=YYYY-MM-DD
///
/// Seven slots Monday to Sunday, each with the shoot day on that date if any.
pub async fn week(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<DbId>,
    AppQuery(params): AppQuery<WeekParams>,
) -> AppResult<impl IntoResponse> {
    load_project(&state, project_id).await?;
    let anchor = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let dates = week_of(anchor)?;
    let mut shoot_days = state.store.list_shoot_days(project_id).await?;

    let days = dates
        .iter()
        .map(|date| WeekSlot {
            date: *date,
            shoot_day: shoot_days
                .iter()
                .position(|d| d.shoot_date == *date)
                .map(|i| shoot_days.swap_remove(i)),
        })
        .collect();

    Ok(Json(DataResponse {
        data: WeekSchedule {
            week_start: dates[0],
            days,
        },
    }))
}

/// GET /api/v1/shoot-days/{id}/breakdown
///
/// Running order for the day's call sheet, in script order.
pub async fn breakdown(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let day = load_shoot_day(&state, id).await?;
    let project = load_project(&state, day.project_id).await?;

    let breakdown = build_day_breakdown(
        &day.general_call_time,
        &day.scenes_scheduled,
        project.scenes(),
    );

    if !breakdown.missing_scenes.is_empty() {
        tracing::warn!(
            shoot_day_id = id,
            missing = ?breakdown.missing_scenes,
            "Shoot day references scenes absent from the script"
        );
    }

    Ok(Json(DataResponse {
        data: ShootDayBreakdown {
            shoot_day_id: day.id,
            shoot_date: day.shoot_date,
            breakdown,
        },
    }))
}
