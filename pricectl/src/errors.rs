use crate::api::models::envelope::ErrorResponse;
use crate::db::errors::DbError;
use crate::types::Resource;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;
use tracing::Level;

/// Message returned when a failure carries nothing a client can act on.
pub const GENERIC_ERROR_MESSAGE: &str = "Sorry, an error has occurred.";

#[derive(ThisError, Debug)]
pub enum Error {
    /// Malformed request: unparseable body, missing fields, non-integer path IDs
    #[error("{message}")]
    BadRequest { message: String },

    /// A resource referenced by the request path does not exist
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: Resource, id: i64 },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn not_found(resource: Resource, id: i64) -> Self {
        Error::NotFound { resource, id }
    }

    /// Anything other than a missing resource is reported as a bad request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } | Error::Database(DbError::NotFound) => StatusCode::NOT_FOUND,
            Error::BadRequest { .. } | Error::Database(_) | Error::Other(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Store faults log at `error`, rejected writes at `warn`, client errors at `debug`.
    pub fn log_level(&self) -> Level {
        match self {
            Error::Database(db_err) if db_err.is_constraint_violation() => Level::WARN,
            Error::Database(DbError::NotFound) | Error::BadRequest { .. } | Error::NotFound { .. } => Level::DEBUG,
            Error::Database(_) | Error::Other(_) => Level::ERROR,
        }
    }

    /// The message placed in the error envelope
    pub fn user_message(&self) -> String {
        match self {
            Error::BadRequest { message } if !message.is_empty() => message.clone(),
            Error::NotFound { resource, .. } => resource.not_found_message().to_string(),
            Error::Database(db_err) => {
                let message = db_err.message();
                if message.is_empty() {
                    GENERIC_ERROR_MESSAGE.to_string()
                } else {
                    message
                }
            }
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match self.log_level() {
            Level::ERROR => tracing::error!("Internal service error: {:#}", self),
            Level::WARN => tracing::warn!("Database constraint error: {}", self),
            _ => tracing::debug!("Client error: {}", self),
        }

        let status = self.status_code();
        (status, Json(ErrorResponse::new(self.user_message()))).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
