//! Script scenes as produced by script analysis.
//!
//! Scenes are read-only input to scheduling: they arrive as the JSON result
//! of an external breakdown service and are stored verbatim on the project.
//! Only `scene_number` is required; every other attribute may be missing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Interior flag as written by the breakdown service.
pub const INT: &str = "INT";

/// Exterior flag as written by the breakdown service.
pub const EXT: &str = "EXT";

/// Maximum length of a scene number (e.g. "12A", "104B-PT2").
pub const MAX_SCENE_NUMBER_LENGTH: usize = 32;

/// Upper bound on a single scene's shooting-time estimate, in hours.
pub const MAX_SCENE_HOURS: f64 = 24.0;

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A single screenplay scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub scene_number: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    /// `INT`, `EXT` or `INT/EXT`.
    #[serde(default)]
    pub int_ext: String,
    /// Free-text tag such as `DAY`, `NIGHT`, `DUSK`.
    #[serde(default)]
    pub time_of_day: String,
    #[serde(default)]
    pub characters: Vec<String>,
    /// Estimated shooting time in hours.
    #[serde(default)]
    pub estimated_shooting_time: Option<f64>,
    #[serde(default)]
    pub complexity_score: Option<i32>,
}

impl Scene {
    /// Minimal scene with only a number set. Handy for tests and fixtures.
    pub fn numbered(scene_number: impl Into<String>) -> Self {
        Self {
            scene_number: scene_number.into(),
            description: String::new(),
            location: String::new(),
            int_ext: String::new(),
            time_of_day: String::new(),
            characters: Vec::new(),
            estimated_shooting_time: None,
            complexity_score: None,
        }
    }

    pub fn is_interior(&self) -> bool {
        self.int_ext.trim().to_uppercase().starts_with(INT)
    }

    /// `INT/EXT` scenes count as both interior and exterior.
    pub fn is_exterior(&self) -> bool {
        self.int_ext.to_uppercase().contains(EXT)
    }

    pub fn time_of_day_class(&self) -> TimeOfDay {
        TimeOfDay::classify(&self.time_of_day)
    }
}

// ---------------------------------------------------------------------------
// Time of day
// ---------------------------------------------------------------------------

/// Coarse lighting class derived from a scene's free-text time-of-day tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Day,
    Night,
    Dawn,
    Dusk,
}

impl TimeOfDay {
    /// Classify a tag by case-insensitive substring match.
    ///
    /// `NIGHT` wins over everything else; `DAWN`/`SUNRISE` map to dawn,
    /// `DUSK`/`SUNSET` to dusk, anything else (including empty) is day.
    pub fn classify(tag: &str) -> Self {
        let tag = tag.to_uppercase();
        if tag.contains("NIGHT") {
            TimeOfDay::Night
        } else if tag.contains("DAWN") || tag.contains("SUNRISE") {
            TimeOfDay::Dawn
        } else if tag.contains("DUSK") || tag.contains("SUNSET") {
            TimeOfDay::Dusk
        } else {
            TimeOfDay::Day
        }
    }
}

// ---------------------------------------------------------------------------
// Script breakdown
// ---------------------------------------------------------------------------

/// The stored result of analysing a project's script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptBreakdown {
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

/// Validate a single scene number: non-blank and within the length limit.
pub fn validate_scene_number(scene_number: &str) -> Result<(), String> {
    if scene_number.trim().is_empty() {
        return Err("Scene number cannot be empty".to_string());
    }
    if scene_number.len() > MAX_SCENE_NUMBER_LENGTH {
        return Err(format!(
            "Scene number exceeds maximum length of {MAX_SCENE_NUMBER_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate a shooting-time estimate. Zero means "no estimate".
pub fn validate_estimate(hours: f64) -> Result<(), String> {
    if !hours.is_finite() || !(0.0..=MAX_SCENE_HOURS).contains(&hours) {
        return Err(format!(
            "Estimated shooting time must be between 0 and {MAX_SCENE_HOURS} hours"
        ));
    }
    Ok(())
}

/// Validate a breakdown before it is stored: every scene number must be
/// valid and unique within the script, and every estimate in range.
pub fn validate_breakdown(breakdown: &ScriptBreakdown) -> Result<(), CoreError> {
    let mut seen = HashSet::with_capacity(breakdown.scenes.len());
    for scene in &breakdown.scenes {
        validate_scene_number(&scene.scene_number).map_err(CoreError::Validation)?;
        if let Some(hours) = scene.estimated_shooting_time {
            validate_estimate(hours).map_err(|msg| {
                CoreError::Validation(format!("Scene '{}': {msg}", scene.scene_number))
            })?;
        }
        if !seen.insert(scene.scene_number.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate scene number '{}' in script breakdown",
                scene.scene_number
            )));
        }
    }
    Ok(())
}
