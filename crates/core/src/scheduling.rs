//! Shoot-day scheduling assignment model.
//!
//! Maintains the relation between script scenes and calendar shoot days.
//! Everything here is pure: callers load the current shoot days, ask this
//! module for a plan, and persist the plan in one atomic write. Two
//! invariants hold across a project:
//!
//! - at most one shoot day per calendar date;
//! - a scene number appears in at most one shoot day's `scenes_scheduled`.
//!
//! This module lives in `core` (zero internal deps) so both the repository
//! layer and the in-memory store apply exactly the same rules.

use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveTime};
use serde::Serialize;

use crate::error::CoreError;
use crate::scene::Scene;
use crate::types::{DbId, ShootDate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Status label given to newly created shoot days.
pub const STATUS_PLANNED: &str = "planned";

/// Default general call time for a new shoot day.
pub const DEFAULT_CALL_TIME: &str = "07:00";

/// Default estimated wrap time for a new shoot day.
pub const DEFAULT_WRAP_TIME: &str = "19:00";

/// Maximum length of the free-text status label.
pub const MAX_STATUS_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Shoot day view
// ---------------------------------------------------------------------------

/// The slice of a shoot day record that scheduling needs.
///
/// Implemented by the persisted row type so the planning functions work on
/// whatever the store hands back.
pub trait ScheduledDay {
    fn day_id(&self) -> DbId;
    fn shoot_date(&self) -> ShootDate;
    fn scenes_scheduled(&self) -> &[String];

    fn has_scene(&self, scene_number: &str) -> bool {
        self.scenes_scheduled().iter().any(|s| s == scene_number)
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Scenes whose number is not scheduled on any day, in input order.
///
/// Never fails; returns an empty vec when every scene is scheduled.
pub fn list_unscheduled<'a, D: ScheduledDay>(scenes: &'a [Scene], days: &[D]) -> Vec<&'a Scene> {
    let scheduled: HashSet<&str> = days
        .iter()
        .flat_map(|d| d.scenes_scheduled().iter().map(String::as_str))
        .collect();

    scenes
        .iter()
        .filter(|scene| !scheduled.contains(scene.scene_number.as_str()))
        .collect()
}

/// ID of the shoot day that currently owns `scene_number`, if any.
pub fn scheduled_day_for<D: ScheduledDay>(days: &[D], scene_number: &str) -> Option<DbId> {
    days.iter()
        .find(|d| d.has_scene(scene_number))
        .map(|d| d.day_id())
}

/// Look up a day by ID, failing with `NotFound`.
pub fn find_day<D: ScheduledDay>(days: &[D], id: DbId) -> Result<&D, CoreError> {
    days.iter()
        .find(|d| d.day_id() == id)
        .ok_or_else(|| CoreError::shoot_day_not_found(id))
}

/// The Monday-first calendar week containing `date`.
///
/// Fails with `Validation` when the week runs past the representable
/// calendar range.
pub fn week_of(date: ShootDate) -> Result<[ShootDate; 7], CoreError> {
    let out_of_range =
        || CoreError::Validation(format!("Date {date} is out of range for a calendar week"));

    let back = u64::from(date.weekday().num_days_from_monday());
    let monday = date.checked_sub_days(Days::new(back)).ok_or_else(out_of_range)?;
    monday
        .checked_add_days(Days::new(6))
        .ok_or_else(out_of_range)?;

    Ok(std::array::from_fn(|offset| monday + Days::new(offset as u64)))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject a new shoot day on a date that already has one.
pub fn ensure_date_available<D: ScheduledDay>(
    days: &[D],
    date: ShootDate,
) -> Result<(), CoreError> {
    match days.iter().find(|d| d.shoot_date() == date) {
        Some(existing) => Err(CoreError::Validation(format!(
            "A shoot day already exists for {date} (id {})",
            existing.day_id()
        ))),
        None => Ok(()),
    }
}

/// Reject scene numbers that are not part of the project's script.
pub fn ensure_known_scene(scenes: &[Scene], scene_number: &str) -> Result<(), CoreError> {
    if scenes.iter().any(|s| s.scene_number == scene_number) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Scene '{scene_number}' is not in the project's script breakdown"
        )))
    }
}

/// Normalise the scenes requested for a new shoot day.
///
/// Duplicates collapse to their first occurrence. Unknown scene numbers and
/// scenes already scheduled on another day are rejected.
pub fn prepare_initial_scenes<D: ScheduledDay>(
    days: &[D],
    scenes: &[Scene],
    requested: &[String],
) -> Result<Vec<String>, CoreError> {
    let mut prepared: Vec<String> = Vec::with_capacity(requested.len());
    for scene_number in requested {
        if prepared.contains(scene_number) {
            continue;
        }
        ensure_known_scene(scenes, scene_number)?;
        if let Some(owner) = scheduled_day_for(days, scene_number) {
            return Err(CoreError::Validation(format!(
                "Scene '{scene_number}' is already scheduled on shoot day {owner}"
            )));
        }
        prepared.push(scene_number.clone());
    }
    Ok(prepared)
}

/// Validate a `HH:MM` 24-hour clock time.
pub fn validate_clock_time(value: &str) -> Result<(), String> {
    if value.len() != 5 || NaiveTime::parse_from_str(value, "%H:%M").is_err() {
        return Err(format!("Invalid time '{value}'. Expected HH:MM (24-hour)"));
    }
    Ok(())
}

/// Validate the free-text status label: non-blank and within the length limit.
pub fn validate_status(status: &str) -> Result<(), String> {
    if status.trim().is_empty() {
        return Err("Status cannot be empty".to_string());
    }
    if status.len() > MAX_STATUS_LENGTH {
        return Err(format!(
            "Status exceeds maximum length of {MAX_STATUS_LENGTH} characters"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Mutation plans
// ---------------------------------------------------------------------------

/// Result of asking to put a scene on a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AssignOutcome {
    /// The scene was added to the target day.
    Assigned,
    /// The scene was already on the target day; nothing changed.
    AlreadyScheduled,
    /// The scene belongs to another day; nothing changed.
    ScheduledElsewhere { shoot_day_id: DbId },
}

impl AssignOutcome {
    /// Whether the plan requires a write.
    pub fn changed(&self) -> bool {
        matches!(self, AssignOutcome::Assigned)
    }
}

/// New scene list for the target day plus what happened.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentPlan {
    pub outcome: AssignOutcome,
    pub scenes: Vec<String>,
}

/// Plan adding `scene_number` to day `target`.
///
/// Idempotent for a scene already on the target. A scene owned by another
/// day is left where it is: use [`plan_move`] to transfer it.
pub fn plan_assignment<D: ScheduledDay>(
    days: &[D],
    target: DbId,
    scene_number: &str,
) -> Result<AssignmentPlan, CoreError> {
    let day = find_day(days, target)?;
    let mut scenes = day.scenes_scheduled().to_vec();

    let outcome = if day.has_scene(scene_number) {
        AssignOutcome::AlreadyScheduled
    } else if let Some(owner) = scheduled_day_for(days, scene_number) {
        AssignOutcome::ScheduledElsewhere {
            shoot_day_id: owner,
        }
    } else {
        scenes.push(scene_number.to_string());
        AssignOutcome::Assigned
    };

    Ok(AssignmentPlan { outcome, scenes })
}

/// New scene list for a day after removing a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovalPlan {
    pub removed: bool,
    pub scenes: Vec<String>,
}

/// Plan removing `scene_number` from day `target`. No-op if absent.
pub fn plan_removal<D: ScheduledDay>(
    days: &[D],
    target: DbId,
    scene_number: &str,
) -> Result<RemovalPlan, CoreError> {
    let day = find_day(days, target)?;
    let removed = day.has_scene(scene_number);
    let scenes = day
        .scenes_scheduled()
        .iter()
        .filter(|s| s.as_str() != scene_number)
        .cloned()
        .collect();
    Ok(RemovalPlan { removed, scenes })
}

/// New scene lists for both days of a move.
#[derive(Debug, Clone, PartialEq)]
pub struct MovePlan {
    pub moved: bool,
    pub from_scenes: Vec<String>,
    pub to_scenes: Vec<String>,
}

/// Plan moving `scene_number` from day `from` to day `to` in one step.
///
/// The scene must currently be on `from`. Moving onto the same day is a
/// no-op.
pub fn plan_move<D: ScheduledDay>(
    days: &[D],
    from: DbId,
    to: DbId,
    scene_number: &str,
) -> Result<MovePlan, CoreError> {
    let from_day = find_day(days, from)?;
    let to_day = find_day(days, to)?;

    if !from_day.has_scene(scene_number) {
        return Err(CoreError::Validation(format!(
            "Scene '{scene_number}' is not scheduled on shoot day {from}"
        )));
    }

    if from == to {
        let scenes = from_day.scenes_scheduled().to_vec();
        return Ok(MovePlan {
            moved: false,
            from_scenes: scenes.clone(),
            to_scenes: scenes,
        });
    }

    let from_scenes = from_day
        .scenes_scheduled()
        .iter()
        .filter(|s| s.as_str() != scene_number)
        .cloned()
        .collect();

    let mut to_scenes = to_day.scenes_scheduled().to_vec();
    if !to_day.has_scene(scene_number) {
        to_scenes.push(scene_number.to_string());
    }

    Ok(MovePlan {
        moved: true,
        from_scenes,
        to_scenes,
    })
}
