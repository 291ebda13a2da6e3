//! Store error type shared by every backend

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: i64 },

    /// Unique constraint violated
    #[error("{resource} with this {field} already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
    },

    /// Clearing a team's member associations failed; the team row is untouched.
    #[error("failed to clear team members association: {0}")]
    AssociationClear(#[source] sqlx::Error),
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound { resource, id }
    }

    /// Map a write error, turning unique violations into [`DbError::Conflict`].
    pub(crate) fn on_write(
        err: sqlx::Error,
        resource: &'static str,
        field: &'static str,
    ) -> Self {
        if let Some(database_error) = err.as_database_error() {
            if database_error.is_unique_violation() {
                return Self::Conflict { resource, field };
            }
        }

        Self::Sqlx(err)
    }
}
