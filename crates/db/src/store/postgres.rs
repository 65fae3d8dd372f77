//! Postgres-backed [`ScheduleStore`].
//!
//! Each schedule mutation runs in one transaction that first locks the
//! owning project row, then plans against the locked day list.

use async_trait::async_trait;
use clapper_core::error::CoreError;
use clapper_core::scene::ScriptBreakdown;
use clapper_core::scheduling::{self, AssignOutcome};
use clapper_core::types::DbId;
use sqlx::{Postgres, Transaction};

use super::ScheduleStore;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::shoot_day::{CreateShootDay, ShootDay, UpdateShootDay};
use crate::repositories::{ProjectRepo, ShootDayRepo};
use crate::DbPool;

/// Unique constraint backing the one-day-per-date rule.
const DATE_CONSTRAINT: &str = "uq_shoot_days_project_date";

/// [`ScheduleStore`] over a Postgres pool.
#[derive(Clone)]
pub struct PgScheduleStore {
    pool: DbPool,
}

impl PgScheduleStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction and lock the project that owns shoot day `id`.
    ///
    /// Returns the open transaction and the project's days as seen under the
    /// lock.
    async fn lock_schedule_of_day(
        &self,
        id: DbId,
    ) -> Result<(Transaction<'static, Postgres>, Vec<ShootDay>), CoreError> {
        let mut tx = self.pool.begin().await.map_err(persistence)?;
        let project_id = ShootDayRepo::project_id_of(&mut tx, id)
            .await
            .map_err(persistence)?
            .ok_or_else(|| CoreError::shoot_day_not_found(id))?;
        ProjectRepo::lock(&mut tx, project_id)
            .await
            .map_err(persistence)?
            .ok_or_else(|| CoreError::project_not_found(project_id))?;
        let days = ShootDayRepo::list_by_project_in(&mut tx, project_id)
            .await
            .map_err(persistence)?;
        Ok((tx, days))
    }
}

/// Write a day's scene list inside `tx`, failing with `NotFound` if the row
/// is gone.
async fn write_scenes(
    tx: &mut Transaction<'static, Postgres>,
    id: DbId,
    scenes: &[String],
) -> Result<ShootDay, CoreError> {
    ShootDayRepo::set_scenes(tx, id, scenes)
        .await
        .map_err(persistence)?
        .ok_or_else(|| CoreError::shoot_day_not_found(id))
}

#[async_trait]
impl ScheduleStore for PgScheduleStore {
    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(persistence)
    }

    async fn create_project(&self, input: &CreateProject) -> Result<Project, CoreError> {
        ProjectRepo::create(&self.pool, input)
            .await
            .map_err(persistence)
    }

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, CoreError> {
        ProjectRepo::find_by_id(&self.pool, id)
            .await
            .map_err(persistence)
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, CoreError> {
        ProjectRepo::update(&self.pool, id, input)
            .await
            .map_err(persistence)
    }

    async fn set_script_breakdown(
        &self,
        id: DbId,
        breakdown: &ScriptBreakdown,
    ) -> Result<Option<Project>, CoreError> {
        ProjectRepo::set_script_breakdown(&self.pool, id, breakdown)
            .await
            .map_err(persistence)
    }

    async fn list_shoot_days(&self, project_id: DbId) -> Result<Vec<ShootDay>, CoreError> {
        ShootDayRepo::list_by_project(&self.pool, project_id)
            .await
            .map_err(persistence)
    }

    async fn find_shoot_day(&self, id: DbId) -> Result<Option<ShootDay>, CoreError> {
        ShootDayRepo::find_by_id(&self.pool, id)
            .await
            .map_err(persistence)
    }

    async fn create_shoot_day(&self, input: &CreateShootDay) -> Result<ShootDay, CoreError> {
        let mut tx = self.pool.begin().await.map_err(persistence)?;

        let project = ProjectRepo::lock(&mut tx, input.project_id)
            .await
            .map_err(persistence)?
            .ok_or_else(|| CoreError::project_not_found(input.project_id))?;
        let days = ShootDayRepo::list_by_project_in(&mut tx, input.project_id)
            .await
            .map_err(persistence)?;

        scheduling::ensure_date_available(&days, input.shoot_date)?;
        let scenes =
            scheduling::prepare_initial_scenes(&days, project.scenes(), &input.scenes_scheduled)?;

        let day = ShootDayRepo::insert(&mut tx, input, &scenes)
            .await
            .map_err(persistence)?;
        tx.commit().await.map_err(persistence)?;
        Ok(day)
    }

    async fn update_shoot_day(
        &self,
        id: DbId,
        input: &UpdateShootDay,
    ) -> Result<Option<ShootDay>, CoreError> {
        ShootDayRepo::update(&self.pool, id, input)
            .await
            .map_err(persistence)
    }

    async fn assign_scene(
        &self,
        id: DbId,
        scene_number: &str,
    ) -> Result<(ShootDay, AssignOutcome), CoreError> {
        let (mut tx, days) = self.lock_schedule_of_day(id).await?;
        let plan = scheduling::plan_assignment(&days, id, scene_number)?;

        let day = if plan.outcome.changed() {
            write_scenes(&mut tx, id, &plan.scenes).await?
        } else {
            scheduling::find_day(&days, id)?.clone()
        };
        tx.commit().await.map_err(persistence)?;
        Ok((day, plan.outcome))
    }

    async fn remove_scene(&self, id: DbId, scene_number: &str) -> Result<ShootDay, CoreError> {
        let (mut tx, days) = self.lock_schedule_of_day(id).await?;
        let plan = scheduling::plan_removal(&days, id, scene_number)?;

        let day = if plan.removed {
            write_scenes(&mut tx, id, &plan.scenes).await?
        } else {
            scheduling::find_day(&days, id)?.clone()
        };
        tx.commit().await.map_err(persistence)?;
        Ok(day)
    }

    async fn move_scene(
        &self,
        from: DbId,
        to: DbId,
        scene_number: &str,
    ) -> Result<(ShootDay, ShootDay), CoreError> {
        let (mut tx, days) = self.lock_schedule_of_day(from).await?;
        // `to` must be in the same project; plan_move reports it missing otherwise.
        let plan = scheduling::plan_move(&days, from, to, scene_number)?;

        if !plan.moved {
            let day = scheduling::find_day(&days, from)?.clone();
            tx.commit().await.map_err(persistence)?;
            return Ok((day.clone(), day));
        }

        let from_day = write_scenes(&mut tx, from, &plan.from_scenes).await?;
        let to_day = write_scenes(&mut tx, to, &plan.to_scenes).await?;
        tx.commit().await.map_err(persistence)?;
        Ok((from_day, to_day))
    }

    /// Deletes under the project lock so no assignment is planned against a
    /// day that disappears before it is written.
    async fn delete_shoot_day(&self, id: DbId) -> Result<bool, CoreError> {
        let mut tx = self.pool.begin().await.map_err(persistence)?;
        let Some(project_id) = ShootDayRepo::project_id_of(&mut tx, id)
            .await
            .map_err(persistence)?
        else {
            return Ok(false);
        };
        ProjectRepo::lock(&mut tx, project_id)
            .await
            .map_err(persistence)?;

        let deleted = ShootDayRepo::delete(&mut tx, id)
            .await
            .map_err(persistence)?;
        tx.commit().await.map_err(persistence)?;
        Ok(deleted)
    }
}

/// Map a sqlx error onto the domain error.
///
/// - Unique violation of the date constraint is a validation failure.
/// - Everything else is a persistence fault, logged here.
fn persistence(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        // PostgreSQL unique constraint violation: error code 23505
        if db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(DATE_CONSTRAINT)
        {
            return CoreError::Validation(
                "A shoot day already exists for that date".to_string(),
            );
        }
    }
    tracing::error!(error = %err, "Schedule store operation failed");
    CoreError::Persistence(err.to_string())
}
