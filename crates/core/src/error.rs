use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The persistence collaborator rejected or failed a read/write.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl CoreError {
    /// Shorthand for a missing shoot day.
    pub fn shoot_day_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "ShootDay",
            id,
        }
    }

    /// Shorthand for a missing project.
    pub fn project_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "Project",
            id,
        }
    }
}
