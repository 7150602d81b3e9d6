use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Signup against an email that is already registered.
    #[error("User already exists")]
    DuplicateEmail,

    /// Login or session lookup against an unknown account.
    #[error("User not found")]
    UserNotFound,

    /// Login with a password that does not match the stored hash.
    #[error("Invalid password")]
    InvalidPassword,

    /// A request to a protected route without a verifiable session.
    #[error("Authentication failed: {0}")]
    Unauthorized(&'static str),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A chat request without a prompt.
    #[error("Prompt is required.")]
    MissingPrompt,

    /// The upstream generation service failed or answered garbage.
    #[error("Generation error: {0}")]
    Generation(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{err:#}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }

            AppError::DuplicateEmail => {
                tracing::warn!("Signup rejected: email already registered");
                (StatusCode::UNAUTHORIZED, "User already exists".to_string())
            }

            AppError::UserNotFound => {
                tracing::warn!("Account lookup failed: user not found");
                (StatusCode::UNAUTHORIZED, "User not found".to_string())
            }

            AppError::InvalidPassword => {
                tracing::warn!("Login rejected: invalid password");
                (StatusCode::FORBIDDEN, "Invalid password".to_string())
            }

            AppError::Unauthorized(reason) => {
                tracing::warn!("Authentication failed: {}", reason);
                (StatusCode::UNAUTHORIZED, reason.to_string())
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::MissingPrompt => {
                tracing::debug!("Chat request without a prompt");
                (StatusCode::BAD_REQUEST, "Prompt is required.".to_string())
            }

            AppError::Generation(ref msg) => {
                tracing::error!("Generation error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
