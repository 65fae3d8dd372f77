//! In-memory [`ScheduleStore`] for tests and local runs without Postgres.
//!
//! A single mutex guards all state, so every mutation is atomic with
//! respect to every other.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use clapper_core::error::CoreError;
use clapper_core::scene::ScriptBreakdown;
use clapper_core::scheduling::{
    self, AssignOutcome, DEFAULT_CALL_TIME, DEFAULT_WRAP_TIME, STATUS_PLANNED,
};
use clapper_core::types::DbId;
use sqlx::types::Json;
use tokio::sync::Mutex;

use super::ScheduleStore;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::shoot_day::{CreateShootDay, ShootDay, UpdateShootDay};

#[derive(Default)]
struct State {
    last_project_id: DbId,
    last_shoot_day_id: DbId,
    projects: BTreeMap<DbId, Project>,
    shoot_days: BTreeMap<DbId, ShootDay>,
}

impl State {
    /// A project's days ordered by date, as the Postgres store returns them.
    fn project_days(&self, project_id: DbId) -> Vec<ShootDay> {
        let mut days: Vec<ShootDay> = self
            .shoot_days
            .values()
            .filter(|d| d.project_id == project_id)
            .cloned()
            .collect();
        days.sort_by_key(|d| d.shoot_date);
        days
    }

    /// Days of the project owning shoot day `id`.
    fn sibling_days(&self, id: DbId) -> Result<Vec<ShootDay>, CoreError> {
        let day = self
            .shoot_days
            .get(&id)
            .ok_or_else(|| CoreError::shoot_day_not_found(id))?;
        Ok(self.project_days(day.project_id))
    }

    /// Overwrite a day's scenes and return the updated row.
    fn set_scenes(&mut self, id: DbId, scenes: Vec<String>) -> Result<ShootDay, CoreError> {
        let day = self
            .shoot_days
            .get_mut(&id)
            .ok_or_else(|| CoreError::shoot_day_not_found(id))?;
        day.scenes_scheduled = scenes;
        day.updated_at = Utc::now();
        Ok(day.clone())
    }
}

/// [`ScheduleStore`] holding everything in process memory.
#[derive(Default)]
pub struct MemoryScheduleStore {
    state: Mutex<State>,
}

impl MemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleStore for MemoryScheduleStore {
    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }

    async fn create_project(&self, input: &CreateProject) -> Result<Project, CoreError> {
        let mut state = self.state.lock().await;
        state.last_project_id += 1;
        let now = Utc::now();
        let project = Project {
            id: state.last_project_id,
            name: input.name.clone(),
            description: input.description.clone(),
            script_breakdown: input.script_breakdown.clone().map(Json),
            created_at: now,
            updated_at: now,
        };
        state.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, CoreError> {
        Ok(self.state.lock().await.projects.get(&id).cloned())
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, CoreError> {
        let mut state = self.state.lock().await;
        let Some(project) = state.projects.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            project.name = name.clone();
        }
        if let Some(description) = &input.description {
            project.description = Some(description.clone());
        }
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn set_script_breakdown(
        &self,
        id: DbId,
        breakdown: &ScriptBreakdown,
    ) -> Result<Option<Project>, CoreError> {
        let mut state = self.state.lock().await;
        let Some(project) = state.projects.get_mut(&id) else {
            return Ok(None);
        };
        project.script_breakdown = Some(Json(breakdown.clone()));
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn list_shoot_days(&self, project_id: DbId) -> Result<Vec<ShootDay>, CoreError> {
        Ok(self.state.lock().await.project_days(project_id))
    }

    async fn find_shoot_day(&self, id: DbId) -> Result<Option<ShootDay>, CoreError> {
        Ok(self.state.lock().await.shoot_days.get(&id).cloned())
    }

    async fn create_shoot_day(&self, input: &CreateShootDay) -> Result<ShootDay, CoreError> {
        let mut state = self.state.lock().await;
        let project = state
            .projects
            .get(&input.project_id)
            .ok_or_else(|| CoreError::project_not_found(input.project_id))?;
        let days = state.project_days(input.project_id);

        scheduling::ensure_date_available(&days, input.shoot_date)?;
        let scenes =
            scheduling::prepare_initial_scenes(&days, project.scenes(), &input.scenes_scheduled)?;

        state.last_shoot_day_id += 1;
        let now = Utc::now();
        let day = ShootDay {
            id: state.last_shoot_day_id,
            project_id: input.project_id,
            shoot_date: input.shoot_date,
            location_id: input.location_id,
            location_name: input.location_name.clone().unwrap_or_default(),
            general_call_time: input
                .general_call_time
                .clone()
                .unwrap_or_else(|| DEFAULT_CALL_TIME.to_string()),
            estimated_wrap_time: input
                .estimated_wrap_time
                .clone()
                .unwrap_or_else(|| DEFAULT_WRAP_TIME.to_string()),
            scenes_scheduled: scenes,
            status: input
                .status
                .clone()
                .unwrap_or_else(|| STATUS_PLANNED.to_string()),
            created_at: now,
            updated_at: now,
        };
        state.shoot_days.insert(day.id, day.clone());
        Ok(day)
    }

    async fn update_shoot_day(
        &self,
        id: DbId,
        input: &UpdateShootDay,
    ) -> Result<Option<ShootDay>, CoreError> {
        let mut state = self.state.lock().await;
        let Some(day) = state.shoot_days.get_mut(&id) else {
            return Ok(None);
        };
        if input.location_id.is_some() {
            day.location_id = input.location_id;
        }
        if let Some(name) = &input.location_name {
            day.location_name = name.clone();
        }
        if let Some(call) = &input.general_call_time {
            day.general_call_time = call.clone();
        }
        if let Some(wrap) = &input.estimated_wrap_time {
            day.estimated_wrap_time = wrap.clone();
        }
        if let Some(status) = &input.status {
            day.status = status.clone();
        }
        day.updated_at = Utc::now();
        Ok(Some(day.clone()))
    }

    async fn assign_scene(
        &self,
        id: DbId,
        scene_number: &str,
    ) -> Result<(ShootDay, AssignOutcome), CoreError> {
        let mut state = self.state.lock().await;
        let days = state.sibling_days(id)?;
        let plan = scheduling::plan_assignment(&days, id, scene_number)?;

        let day = if plan.outcome.changed() {
            state.set_scenes(id, plan.scenes)?
        } else {
            scheduling::find_day(&days, id)?.clone()
        };
        Ok((day, plan.outcome))
    }

    async fn remove_scene(&self, id: DbId, scene_number: &str) -> Result<ShootDay, CoreError> {
        let mut state = self.state.lock().await;
        let days = state.sibling_days(id)?;
        let plan = scheduling::plan_removal(&days, id, scene_number)?;

        if plan.removed {
            state.set_scenes(id, plan.scenes)
        } else {
            Ok(scheduling::find_day(&days, id)?.clone())
        }
    }

    async fn move_scene(
        &self,
        from: DbId,
        to: DbId,
        scene_number: &str,
    ) -> Result<(ShootDay, ShootDay), CoreError> {
        let mut state = self.state.lock().await;
        let days = state.sibling_days(from)?;
        let plan = scheduling::plan_move(&days, from, to, scene_number)?;

        if !plan.moved {
            let day = scheduling::find_day(&days, from)?.clone();
            return Ok((day.clone(), day));
        }

        let from_day = state.set_scenes(from, plan.from_scenes)?;
        let to_day = state.set_scenes(to, plan.to_scenes)?;
        Ok((from_day, to_day))
    }

    async fn delete_shoot_day(&self, id: DbId) -> Result<bool, CoreError> {
        Ok(self.state.lock().await.shoot_days.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use clapper_core::scene::Scene;
    use clapper_core::scheduling::list_unscheduled;

    use super::*;

    async fn project_with_scenes(store: &MemoryScheduleStore, numbers: &[&str]) -> Project {
        store
            .create_project(&CreateProject {
                name: "Night Harbour".into(),
                description: None,
                script_breakdown: Some(ScriptBreakdown {
                    scenes: numbers.iter().map(|n| Scene::numbered(*n)).collect(),
                }),
            })
            .await
            .unwrap()
    }

    fn new_day(project_id: DbId, date: &str, scenes: &[&str]) -> CreateShootDay {
        CreateShootDay {
            project_id,
            shoot_date: date.parse().unwrap(),
            location_id: Some(3),
            location_name: None,
            general_call_time: None,
            estimated_wrap_time: None,
            scenes_scheduled: scenes.iter().map(|s| s.to_string()).collect(),
            status: None,
        }
    }

    async fn unscheduled(store: &MemoryScheduleStore, project_id: DbId) -> Vec<String> {
        let project = store.find_project(project_id).await.unwrap().unwrap();
        let days = store.list_shoot_days(project_id).await.unwrap();
        list_unscheduled(project.scenes(), &days)
            .into_iter()
            .map(|s| s.scene_number.clone())
            .collect()
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let store = MemoryScheduleStore::new();
        let project = project_with_scenes(&store, &["1"]).await;

        let day = store
            .create_shoot_day(&new_day(project.id, "2024-05-01", &[]))
            .await
            .unwrap();

        assert_eq!(day.general_call_time, DEFAULT_CALL_TIME);
        assert_eq!(day.estimated_wrap_time, DEFAULT_WRAP_TIME);
        assert_eq!(day.status, STATUS_PLANNED);
        assert_eq!(day.location_id, Some(3));
    }

    #[tokio::test]
    async fn scenario_assign_first_scene() {
        let store = MemoryScheduleStore::new();
        let project = project_with_scenes(&store, &["1A", "1B", "2"]).await;
        assert_eq!(unscheduled(&store, project.id).await, ["1A", "1B", "2"]);

        let day = store
            .create_shoot_day(&new_day(project.id, "2024-05-01", &[]))
            .await
            .unwrap();
        let (_, outcome) = store.assign_scene(day.id, "1A").await.unwrap();

        assert_eq!(outcome, AssignOutcome::Assigned);
        assert_eq!(unscheduled(&store, project.id).await, ["1B", "2"]);
    }

    #[tokio::test]
    async fn duplicate_date_creates_nothing() {
        let store = MemoryScheduleStore::new();
        let project = project_with_scenes(&store, &["1"]).await;
        store
            .create_shoot_day(&new_day(project.id, "2024-05-01", &[]))
            .await
            .unwrap();

        let result = store
            .create_shoot_day(&new_day(project.id, "2024-05-01", &[]))
            .await;

        assert_matches!(result, Err(CoreError::Validation(_)));
        assert_eq!(store.list_shoot_days(project.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn same_date_in_other_project_is_allowed() {
        let store = MemoryScheduleStore::new();
        let a = project_with_scenes(&store, &["1"]).await;
        let b = project_with_scenes(&store, &["1"]).await;

        store
            .create_shoot_day(&new_day(a.id, "2024-05-01", &["1"]))
            .await
            .unwrap();
        store
            .create_shoot_day(&new_day(b.id, "2024-05-01", &["1"]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_for_missing_project_is_not_found() {
        let store = MemoryScheduleStore::new();
        let result = store.create_shoot_day(&new_day(99, "2024-05-01", &[])).await;
        assert_matches!(result, Err(CoreError::NotFound { entity: "Project", id: 99 }));
    }

    #[tokio::test]
    async fn delete_returns_scenes_to_unscheduled() {
        let store = MemoryScheduleStore::new();
        let project = project_with_scenes(&store, &["1", "2", "3"]).await;
        let day = store
            .create_shoot_day(&new_day(project.id, "2024-05-01", &["1", "3"]))
            .await
            .unwrap();
        assert_eq!(unscheduled(&store, project.id).await, ["2"]);

        assert!(store.delete_shoot_day(day.id).await.unwrap());
        assert!(!store.delete_shoot_day(day.id).await.unwrap());
        assert_eq!(unscheduled(&store, project.id).await, ["1", "2", "3"]);
    }

    #[tokio::test]
    async fn move_keeps_scene_on_exactly_one_day() {
        let store = MemoryScheduleStore::new();
        let project = project_with_scenes(&store, &["1", "2"]).await;
        let monday = store
            .create_shoot_day(&new_day(project.id, "2024-04-29", &["1"]))
            .await
            .unwrap();
        let tuesday = store
            .create_shoot_day(&new_day(project.id, "2024-04-30", &[]))
            .await
            .unwrap();

        let (from, to) = store.move_scene(monday.id, tuesday.id, "1").await.unwrap();

        assert!(from.scenes_scheduled.is_empty());
        assert_eq!(to.scenes_scheduled, ["1"]);
    }

    #[tokio::test]
    async fn concurrent_assignments_leave_one_owner() {
        let store = MemoryScheduleStore::new();
        let project = project_with_scenes(&store, &["7"]).await;
        let d1 = store
            .create_shoot_day(&new_day(project.id, "2024-05-01", &[]))
            .await
            .unwrap();
        let d2 = store
            .create_shoot_day(&new_day(project.id, "2024-05-02", &[]))
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            store.assign_scene(d1.id, "7"),
            store.assign_scene(d2.id, "7"),
        );
        let outcomes = [first.unwrap().1, second.unwrap().1];

        let assigned = outcomes
            .iter()
            .filter(|o| **o == AssignOutcome::Assigned)
            .count();
        assert_eq!(assigned, 1);
        assert!(outcomes
            .iter()
            .any(|o| matches!(o, AssignOutcome::ScheduledElsewhere { .. })));

        let days = store.list_shoot_days(project.id).await.unwrap();
        let owners = days
            .iter()
            .filter(|d| d.scenes_scheduled.iter().any(|s| s == "7"))
            .count();
        assert_eq!(owners, 1);
        assert!(unscheduled(&store, project.id).await.is_empty());
    }

    #[tokio::test]
    async fn delete_racing_assignment_is_not_found_or_assigned() {
        let store = MemoryScheduleStore::new();
        let project = project_with_scenes(&store, &["1"]).await;
        let day = store
            .create_shoot_day(&new_day(project.id, "2024-05-01", &[]))
            .await
            .unwrap();

        let (assigned, deleted) =
            tokio::join!(store.assign_scene(day.id, "1"), store.delete_shoot_day(day.id));

        assert!(deleted.unwrap());
        match assigned {
            Ok((_, outcome)) => assert_eq!(outcome, AssignOutcome::Assigned),
            Err(err) => assert_matches!(err, CoreError::NotFound { entity: "ShootDay", .. }),
        }
        assert_eq!(unscheduled(&store, project.id).await, ["1"]);
    }

    #[tokio::test]
    async fn move_across_projects_is_not_found() {
        let store = MemoryScheduleStore::new();
        let a = project_with_scenes(&store, &["1"]).await;
        let b = project_with_scenes(&store, &["1"]).await;
        let day_a = store
            .create_shoot_day(&new_day(a.id, "2024-05-01", &["1"]))
            .await
            .unwrap();
        let day_b = store
            .create_shoot_day(&new_day(b.id, "2024-05-01", &[]))
            .await
            .unwrap();

        let result = store.move_scene(day_a.id, day_b.id, "1").await;
        assert_matches!(result, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_patches_only_given_fields() {
        let store = MemoryScheduleStore::new();
        let project = project_with_scenes(&store, &[]).await;
        let day = store
            .create_shoot_day(&new_day(project.id, "2024-05-01", &[]))
            .await
            .unwrap();

        let updated = store
            .update_shoot_day(
                day.id,
                &UpdateShootDay {
                    general_call_time: Some("06:30".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.general_call_time, "06:30");
        assert_eq!(updated.estimated_wrap_time, DEFAULT_WRAP_TIME);
        assert_eq!(updated.location_id, Some(3));
    }
}
