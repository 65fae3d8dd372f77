//! Project entity model and DTOs.

use clapper_core::error::CoreError;
use clapper_core::scene::{validate_breakdown, Scene, ScriptBreakdown};
use clapper_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

use super::validation_error;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Result of script analysis; `None` until a script has been broken down.
    pub script_breakdown: Option<Json<ScriptBreakdown>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// The project's script scenes, empty if no breakdown is stored yet.
    pub fn scenes(&self) -> &[Scene] {
        self.script_breakdown
            .as_ref()
            .map(|b| b.0.scenes.as_slice())
            .unwrap_or(&[])
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub script_breakdown: Option<ScriptBreakdown>,
}

impl CreateProject {
    /// Field-level checks plus scene-number uniqueness of any breakdown.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(validation_error)?;
        if let Some(breakdown) = &self.script_breakdown {
            validate_breakdown(breakdown)?;
        }
        Ok(())
    }
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl UpdateProject {
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(validation_error)
    }
}
