//! Call sheet assembly.
//!
//! Call sheets themselves, the crew roster and crew assignments are owned by
//! an external collaborator and arrive in the request body. The handlers
//! combine them with the stored shoot day and script.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use clapper_core::breakdown::{build_day_breakdown, DayBreakdown};
use clapper_core::call_sheet::{
    build_crew_call_sheet, days_without_call_sheet, ensure_no_call_sheet, validate_assignments,
    CrewAssignment, CrewCallSheet, CrewMember,
};
use clapper_core::types::{DbId, ShootDate};
use clapper_db::models::shoot_day::ShootDay;
use serde::{Deserialize, Serialize};

use super::{load_project, load_shoot_day};
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallSheetRequest {
    #[serde(default)]
    pub crew: Vec<CrewMember>,
    #[serde(default)]
    pub assignments: Vec<CrewAssignment>,
    /// Dates of the project's existing call sheets.
    #[serde(default)]
    pub existing_call_sheet_dates: Vec<ShootDate>,
}

#[derive(Debug, Deserialize)]
pub struct PendingCallSheetsRequest {
    #[serde(default)]
    pub existing_call_sheet_dates: Vec<ShootDate>,
}

#[derive(Debug, Serialize)]
pub struct CallSheet {
    pub shoot_day_id: DbId,
    pub shoot_date: ShootDate,
    /// Position of this sheet among the project's call sheets, from 1.
    pub day_number: usize,
    pub location_name: String,
    pub estimated_wrap_time: String,
    pub schedule: DayBreakdown,
    #[serde(flatten)]
    pub crew: CrewCallSheet,
}

/// POST /api/v1/shoot-days/{id}/call-sheet
///
/// Assemble the call sheet for a day: running order, crew by department,
/// catering and dietary warnings.
pub async fn assemble(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<CallSheetRequest>,
) -> AppResult<impl IntoResponse> {
    validate_assignments(&input.assignments)?;

    let day = load_shoot_day(&state, id).await?;
    ensure_no_call_sheet(day.shoot_date, &input.existing_call_sheet_dates)?;
    let project = load_project(&state, day.project_id).await?;

    let schedule = build_day_breakdown(
        &day.general_call_time,
        &day.scenes_scheduled,
        project.scenes(),
    );
    let crew = build_crew_call_sheet(
        day.shoot_date,
        &day.general_call_time,
        &input.assignments,
        &input.crew,
    );

    if !crew.unknown_crew_member_ids.is_empty() {
        tracing::warn!(
            shoot_day_id = id,
            unknown = ?crew.unknown_crew_member_ids,
            "Assignments reference crew members absent from the roster"
        );
    }
    tracing::info!(
        shoot_day_id = id,
        departments = crew.departments.len(),
        scenes = schedule.entries.len(),
        "Call sheet assembled"
    );

    Ok(Json(DataResponse {
        data: CallSheet {
            shoot_day_id: day.id,
            shoot_date: day.shoot_date,
            day_number: input.existing_call_sheet_dates.len() + 1,
            location_name: day.location_name,
            estimated_wrap_time: day.estimated_wrap_time,
            schedule,
            crew,
        },
    }))
}

/// POST /api/v1/projects/{id}/call-sheets/pending
///
/// Shoot days that have no call sheet yet, by date.
pub async fn pending(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<DbId>,
    AppJson(input): AppJson<PendingCallSheetsRequest>,
) -> AppResult<impl IntoResponse> {
    load_project(&state, project_id).await?;
    let days = state.store.list_shoot_days(project_id).await?;

    let pending: Vec<ShootDay> = days_without_call_sheet(&days, &input.existing_call_sheet_dates)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(DataResponse { data: pending }))
}
