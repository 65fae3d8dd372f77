//! Repository for the `shoot_days` table.
//!
//! Scene assignment writes go through the transaction-scoped helpers so the
//! store can read, check and write a project's schedule under one lock.

use clapper_core::scheduling::{DEFAULT_CALL_TIME, DEFAULT_WRAP_TIME, STATUS_PLANNED};
use clapper_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::shoot_day::{CreateShootDay, ShootDay, UpdateShootDay};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, shoot_date, location_id, location_name, \
    general_call_time, estimated_wrap_time, scenes_scheduled, status, \
    created_at, updated_at";

/// Provides CRUD and scene-assignment operations for shoot days.
pub struct ShootDayRepo;

impl ShootDayRepo {
    /// List all shoot days of a project, ordered by date ascending.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ShootDay>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shoot_days
             WHERE project_id = $1
             ORDER BY shoot_date ASC"
        );
        sqlx::query_as::<_, ShootDay>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Find a shoot day by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ShootDay>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shoot_days WHERE id = $1");
        sqlx::query_as::<_, ShootDay>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update shoot day metadata. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateShootDay,
    ) -> Result<Option<ShootDay>, sqlx::Error> {
        let query = format!(
            "UPDATE shoot_days SET
                location_id = COALESCE($2, location_id),
                location_name = COALESCE($3, location_name),
                general_call_time = COALESCE($4, general_call_time),
                estimated_wrap_time = COALESCE($5, estimated_wrap_time),
                status = COALESCE($6, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShootDay>(&query)
            .bind(id)
            .bind(input.location_id)
            .bind(&input.location_name)
            .bind(&input.general_call_time)
            .bind(&input.estimated_wrap_time)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Transaction-scoped helpers
    // -----------------------------------------------------------------------

    /// Delete a shoot day by ID. Returns `true` if a row was removed.
    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM shoot_days WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Owning project of a shoot day, if the day exists.
    pub async fn project_id_of(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT project_id FROM shoot_days WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Load all of a project's shoot days inside a transaction.
    ///
    /// Callers take [`ProjectRepo::lock`](super::ProjectRepo::lock) first so
    /// the list cannot change before they write.
    pub async fn list_by_project_in(
        tx: &mut Transaction<'_, Postgres>,
        project_id: DbId,
    ) -> Result<Vec<ShootDay>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shoot_days
             WHERE project_id = $1
             ORDER BY shoot_date ASC"
        );
        sqlx::query_as::<_, ShootDay>(&query)
            .bind(project_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Insert a new shoot day with an already-checked scene list.
    ///
    /// Unset times and status fall back to `07:00`, `19:00` and `planned`.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateShootDay,
        scenes: &[String],
    ) -> Result<ShootDay, sqlx::Error> {
        let query = format!(
            "INSERT INTO shoot_days
                (project_id, shoot_date, location_id, location_name,
                 general_call_time, estimated_wrap_time, scenes_scheduled, status)
             VALUES ($1, $2, $3, COALESCE($4, ''), COALESCE($5, $6), COALESCE($7, $8), $9,
                     COALESCE($10, $11))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShootDay>(&query)
            .bind(input.project_id)
            .bind(input.shoot_date)
            .bind(input.location_id)
            .bind(&input.location_name)
            .bind(&input.general_call_time)
            .bind(DEFAULT_CALL_TIME)
            .bind(&input.estimated_wrap_time)
            .bind(DEFAULT_WRAP_TIME)
            .bind(scenes)
            .bind(&input.status)
            .bind(STATUS_PLANNED)
            .fetch_one(&mut **tx)
            .await
    }

    /// Overwrite a day's scene list.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_scenes(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        scenes: &[String],
    ) -> Result<Option<ShootDay>, sqlx::Error> {
        let query = format!(
            "UPDATE shoot_days SET scenes_scheduled = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ShootDay>(&query)
            .bind(id)
            .bind(scenes)
            .fetch_optional(&mut **tx)
            .await
    }
}
