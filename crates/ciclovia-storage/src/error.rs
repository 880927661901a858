use thiserror::Error;

/// Storage-specific error types for the bike-share management system.
///
/// These errors represent failures in database operations and data
/// integrity checks. Business-rule rejections (unpaid fines, unavailable
/// bikes, and so on) are NOT errors: the workflow services return them as
/// denial values with an operator-facing message.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection or query execution failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration execution failed
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Entity not found in database
    #[error("Entity not found: {entity_type} with {field}={value}")]
    NotFound {
        entity_type: String,
        field: String,
        value: String,
    },

    /// Referential integrity violation
    #[error("Referential integrity error: {0}")]
    ReferentialIntegrity(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Specialized result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
