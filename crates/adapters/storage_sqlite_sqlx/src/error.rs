//! Storage-specific error type wrapping sqlx errors.

use crewdesk_domain::error::{ConflictError, CrewdeskError};

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<StorageError> for CrewdeskError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Map an insert/update failure, converting unique-constraint violations
/// into [`CrewdeskError::Conflict`] with the offending field named.
pub(crate) fn map_write_err(err: sqlx::Error) -> CrewdeskError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let message = db.message().to_string();
            let field = if message.contains(".email") {
                "email"
            } else if message.contains(".phone_number") {
                "phone_number"
            } else if message.contains(".user_id") {
                "user_id"
            } else {
                "unique"
            };
            return ConflictError { field }.into();
        }
    }
    StorageError::Database(err).into()
}
