//! The schedule store: the persistence collaborator behind the HTTP layer.
//!
//! Every mutating method is a single atomic write. Implementations load the
//! affected project's shoot days, ask `clapper_core::scheduling` for a plan,
//! and apply it without letting another mutation of the same project
//! interleave. Callers re-read after writing.

mod memory;
mod postgres;

use async_trait::async_trait;
use clapper_core::error::CoreError;
use clapper_core::scene::ScriptBreakdown;
use clapper_core::scheduling::AssignOutcome;
use clapper_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::shoot_day::{CreateShootDay, ShootDay, UpdateShootDay};

pub use memory::MemoryScheduleStore;
pub use postgres::PgScheduleStore;

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Confirm the backing store is reachable.
    async fn health_check(&self) -> Result<(), CoreError>;

    // -- Projects --

    async fn create_project(&self, input: &CreateProject) -> Result<Project, CoreError>;

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, CoreError>;

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, CoreError>;

    async fn set_script_breakdown(
        &self,
        id: DbId,
        breakdown: &ScriptBreakdown,
    ) -> Result<Option<Project>, CoreError>;

    // -- Shoot days --

    /// All days of a project ordered by date.
    async fn list_shoot_days(&self, project_id: DbId) -> Result<Vec<ShootDay>, CoreError>;

    async fn find_shoot_day(&self, id: DbId) -> Result<Option<ShootDay>, CoreError>;

    /// Create a day. Fails with `Validation` if the date is taken or an
    /// initial scene is unknown or already scheduled; nothing is written then.
    async fn create_shoot_day(&self, input: &CreateShootDay) -> Result<ShootDay, CoreError>;

    /// Patch location, times and status.
    async fn update_shoot_day(
        &self,
        id: DbId,
        input: &UpdateShootDay,
    ) -> Result<Option<ShootDay>, CoreError>;

    /// Put a scene on a day. Never double-books: see [`AssignOutcome`].
    async fn assign_scene(
        &self,
        id: DbId,
        scene_number: &str,
    ) -> Result<(ShootDay, AssignOutcome), CoreError>;

    /// Take a scene off a day. No-op if it was not there.
    async fn remove_scene(&self, id: DbId, scene_number: &str) -> Result<ShootDay, CoreError>;

    /// Move a scene from one day to another in a single write.
    async fn move_scene(
        &self,
        from: DbId,
        to: DbId,
        scene_number: &str,
    ) -> Result<(ShootDay, ShootDay), CoreError>;

    /// Delete a day; its scenes become unscheduled. Returns `false` if absent.
    async fn delete_shoot_day(&self, id: DbId) -> Result<bool, CoreError>;
}
