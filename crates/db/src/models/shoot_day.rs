//! Shoot day entity model and DTOs.

use clapper_core::error::CoreError;
use clapper_core::scene::validate_scene_number;
use clapper_core::scheduling::{validate_clock_time, validate_status, ScheduledDay};
use clapper_core::types::{DbId, ShootDate, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::validation_error;

/// A row from the `shoot_days` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShootDay {
    pub id: DbId,
    pub project_id: DbId,
    pub shoot_date: ShootDate,
    pub location_id: Option<DbId>,
    pub location_name: String,
    pub general_call_time: String,
    pub estimated_wrap_time: String,
    pub scenes_scheduled: Vec<String>,
    /// Free-text label (`planned`, ...). Not a state machine.
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ScheduledDay for ShootDay {
    fn day_id(&self) -> DbId {
        self.id
    }

    fn shoot_date(&self) -> ShootDate {
        self.shoot_date
    }

    fn scenes_scheduled(&self) -> &[String] {
        &self.scenes_scheduled
    }
}

/// DTO for creating a new shoot day.
///
/// `project_id` is taken from the URL path by the handler.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateShootDay {
    #[serde(default)]
    pub project_id: DbId,
    pub shoot_date: ShootDate,
    pub location_id: Option<DbId>,
    #[validate(length(max = 200))]
    pub location_name: Option<String>,
    /// Defaults to `07:00` if omitted.
    pub general_call_time: Option<String>,
    /// Defaults to `19:00` if omitted.
    pub estimated_wrap_time: Option<String>,
    #[serde(default)]
    pub scenes_scheduled: Vec<String>,
    /// Defaults to `planned` if omitted.
    pub status: Option<String>,
}

impl CreateShootDay {
    /// Field-level checks. Scheduling rules (free date, unscheduled initial
    /// scenes) are applied by the store under its lock.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(validation_error)?;
        check_times_and_status(
            self.general_call_time.as_deref(),
            self.estimated_wrap_time.as_deref(),
            self.status.as_deref(),
        )?;
        for scene_number in &self.scenes_scheduled {
            validate_scene_number(scene_number).map_err(CoreError::Validation)?;
        }
        Ok(())
    }
}

/// DTO for updating shoot day metadata. All fields are optional.
///
/// Scene assignment goes through the dedicated assign/remove/move
/// operations, never through this patch.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateShootDay {
    pub location_id: Option<DbId>,
    #[validate(length(max = 200))]
    pub location_name: Option<String>,
    pub general_call_time: Option<String>,
    pub estimated_wrap_time: Option<String>,
    pub status: Option<String>,
}

impl UpdateShootDay {
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(validation_error)?;
        check_times_and_status(
            self.general_call_time.as_deref(),
            self.estimated_wrap_time.as_deref(),
            self.status.as_deref(),
        )
    }
}

/// Request body for moving a scene between two days.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveScene {
    pub scene_number: String,
    pub to_shoot_day_id: DbId,
}

fn check_times_and_status(
    call: Option<&str>,
    wrap: Option<&str>,
    status: Option<&str>,
) -> Result<(), CoreError> {
    for time in [call, wrap].into_iter().flatten() {
        validate_clock_time(time).map_err(CoreError::Validation)?;
    }
    if let Some(status) = status {
        validate_status(status).map_err(CoreError::Validation)?;
    }
    Ok(())
}
