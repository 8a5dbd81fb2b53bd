use sqlx::error::ErrorKind;
use thiserror::Error;

/// Unified error type for database operations that application code can handle
#[derive(Error, Debug)]
pub enum DbError {
    /// Entity not found by the given identifier
    #[error("Entity not found")]
    NotFound,

    /// Unique constraint violation
    #[error("Unique constraint violation: {message}")]
    UniqueViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Foreign key constraint violation
    #[error("Foreign key constraint violation: {message}")]
    ForeignKeyViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// NOT NULL constraint violation
    #[error("Not null constraint violation: {message}")]
    NotNullViolation { table: Option<String>, message: String },

    /// Check constraint violation
    #[error("Check constraint violation: {message}")]
    CheckViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DbError {
    /// The message reported by the database driver, suitable for returning to clients.
    pub fn message(&self) -> String {
        match self {
            DbError::NotFound => "Entity not found".to_string(),
            DbError::UniqueViolation { message, .. }
            | DbError::ForeignKeyViolation { message, .. }
            | DbError::NotNullViolation { message, .. }
            | DbError::CheckViolation { message, .. } => message.clone(),
            DbError::Other(err) => match err.downcast_ref::<sqlx::Error>() {
                Some(sqlx::Error::Database(db_err)) => db_err.message().to_string(),
                _ => err.to_string(),
            },
        }
    }

    /// Whether this error is a rejected write rather than a store fault.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::UniqueViolation { .. }
                | DbError::ForeignKeyViolation { .. }
                | DbError::NotNullViolation { .. }
                | DbError::CheckViolation { .. }
        )
    }
}

/// Convert from sqlx::Error using sqlx's error categorization
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().map(|s| s.to_string());
                let table = db_err.table().map(|s| s.to_string());
                let message = db_err.message().to_string();

                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation {
                        constraint,
                        table,
                        message,
                    },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                        constraint,
                        table,
                        message,
                    },
                    ErrorKind::NotNullViolation => DbError::NotNullViolation { table, message },
                    ErrorKind::CheckViolation => DbError::CheckViolation {
                        constraint,
                        table,
                        message,
                    },
                    // Everything else (syntax errors, invalid input, etc.) is non-recoverable
                    _ => DbError::Other(anyhow::Error::from(err)),
                }
            }
            // Pool timeouts, IO errors, decode errors...
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

/// Type alias for database operation results
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound));
        assert_eq!(err.message(), "Entity not found");
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn test_pool_timeout_maps_to_other() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DbError::Other(_)));
        assert!(err.message().contains("pool timed out"));
    }

    #[test]
    fn test_constraint_violation_message_is_driver_message() {
        let err = DbError::ForeignKeyViolation {
            constraint: Some("price_pricing_id_fkey".to_string()),
            table: Some("price".to_string()),
            message: "insert or update on table \"price\" violates foreign key constraint".to_string(),
        };
        assert!(err.is_constraint_violation());
        assert_eq!(
            err.message(),
            "insert or update on table \"price\" violates foreign key constraint"
        );
    }
}
