//! Per-day schedule breakdown.
//!
//! Turns a shoot day's scheduled scene numbers into the running order shown
//! on the day's call sheet: one entry per scene in script order with its
//! planned start time, plus totals for the day.

use chrono::{Duration, NaiveTime};
use serde::Serialize;

use crate::scene::{Scene, TimeOfDay};

/// Hours assumed for a scene with no shooting-time estimate.
pub const DEFAULT_SCENE_HOURS: f64 = 2.0;

/// One row of the running order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    /// Planned start as `HH:MM`, or `None` if the call time is unparsable.
    pub start_time: Option<String>,
    /// Hours after general call at which this scene starts.
    pub offset_hours: f64,
    pub scene_number: String,
    pub description: String,
    pub location: String,
    pub int_ext: String,
    pub time_of_day: TimeOfDay,
    pub cast: Vec<String>,
    pub estimated_hours: f64,
}

/// The running order and totals for one shoot day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBreakdown {
    pub general_call_time: String,
    pub entries: Vec<BreakdownEntry>,
    pub total_estimated_hours: f64,
    /// Every character appearing in the day's scenes, first appearance first.
    pub cast: Vec<String>,
    pub interior_scenes: usize,
    pub exterior_scenes: usize,
    /// Scheduled numbers with no matching scene in the script.
    pub missing_scenes: Vec<String>,
}

/// Build the running order for a day.
///
/// Entries follow script order, not the order scenes were dropped onto the
/// day. Each scene starts when the previous one's estimate runs out.
pub fn build_day_breakdown(
    general_call_time: &str,
    scheduled: &[String],
    scenes: &[Scene],
) -> DayBreakdown {
    let call = NaiveTime::parse_from_str(general_call_time, "%H:%M").ok();

    let mut entries = Vec::new();
    let mut cast: Vec<String> = Vec::new();
    let mut offset_hours = 0.0;
    let mut interior_scenes = 0;
    let mut exterior_scenes = 0;

    for scene in scenes.iter().filter(|s| scheduled.contains(&s.scene_number)) {
        let estimated_hours = scene
            .estimated_shooting_time
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(DEFAULT_SCENE_HOURS);

        for character in &scene.characters {
            if !cast.contains(character) {
                cast.push(character.clone());
            }
        }
        if scene.is_interior() {
            interior_scenes += 1;
        }
        if scene.is_exterior() {
            exterior_scenes += 1;
        }

        entries.push(BreakdownEntry {
            start_time: call.and_then(|c| clock_after(c, offset_hours)),
            offset_hours,
            scene_number: scene.scene_number.clone(),
            description: scene.description.clone(),
            location: scene.location.clone(),
            int_ext: scene.int_ext.clone(),
            time_of_day: scene.time_of_day_class(),
            cast: scene.characters.clone(),
            estimated_hours,
        });
        offset_hours += estimated_hours;
    }

    let missing_scenes = scheduled
        .iter()
        .filter(|n| !scenes.iter().any(|s| &s.scene_number == *n))
        .cloned()
        .collect();

    DayBreakdown {
        general_call_time: general_call_time.to_string(),
        entries,
        total_estimated_hours: offset_hours,
        cast,
        interior_scenes,
        exterior_scenes,
        missing_scenes,
    }
}

/// Wall-clock time `hours` after `start`, wrapping past midnight.
///
/// `None` when the offset does not fit in a `chrono::Duration`.
fn clock_after(start: NaiveTime, hours: f64) -> Option<String> {
    if !hours.is_finite() {
        return None;
    }
    let minutes = (hours * 60.0).round();
    if minutes.abs() >= i64::MAX as f64 {
        return None;
    }
    let offset = Duration::try_minutes(minutes as i64)?;
    let (clock, _wrapped_secs) = start.overflowing_add_signed(offset);
    Some(clock.format("%H:%M").to_string())
}
