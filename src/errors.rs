//! Unified error type for the clinic backend.
//!
//! Every fallible operation in the crate returns [`Result`]. The HTTP layer
//! converts errors to responses through the [`axum::response::IntoResponse`]
//! impl below, so handlers can use `?` throughout.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// All error conditions the backend can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration problem (bad settings file, missing environment, etc.)
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (settings file, renderer buffers)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request payload failed validation
    #[error("{message}")]
    Validation {
        /// What was missing or malformed
        message: String,
    },

    /// Referenced record does not exist (or is scoped out, e.g. not archived)
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. "patient"
        entity: &'static str,
        /// Primary key that failed to resolve
        id: i64,
    },

    /// Credentials or token did not authenticate
    #[error("{message}")]
    Unauthorized {
        /// Why authentication failed
        message: String,
    },

    /// Authenticated but not allowed (wrong role, unapproved account)
    #[error("{message}")]
    Forbidden {
        /// Why access was denied
        message: String,
    },

    /// Uniqueness conflict (duplicate username or email at registration)
    #[error("{message}")]
    Conflict {
        /// Which field conflicted
        message: String,
    },

    /// Report or receipt rendering failed
    #[error("rendering failed: {message}")]
    Render {
        /// Renderer error detail
        message: String,
    },
}

impl Error {
    /// Shorthand for a validation error with a formatted message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::Conflict { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Config { .. }
            | Self::Database(_)
            | Self::Io(_)
            | Self::Render { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
