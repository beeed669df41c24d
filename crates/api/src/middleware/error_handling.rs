//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the ClinicDesk API.
//! It maps domain-specific errors to appropriate HTTP status codes and JSON
//! error responses, ensuring a consistent error handling experience across
//! the entire API.
//!
//! Booking rejections (past time, unavailable day, outside working hours,
//! time clash) surface as 400s with the engine's message verbatim; missing
//! records surface as 404s.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use clinicdesk_core::errors::ClinicError;
use clinicdesk_core::scheduling::ScheduleError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `ClinicError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
#[derive(Debug)]
pub struct AppError(pub ClinicError);

/// Converts application errors to HTTP responses
///
/// This implementation maps each error type to the appropriate HTTP status code
/// and formats the error message into a JSON response body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            ClinicError::NotFound(_) => StatusCode::NOT_FOUND,
            ClinicError::Validation(_) => StatusCode::BAD_REQUEST,
            ClinicError::Conflict(_) => StatusCode::BAD_REQUEST,
            ClinicError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ClinicError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ClinicError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from ClinicError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, ClinicError>` in handler functions that return `Result<T, AppError>`.
impl From<ClinicError> for AppError {
    fn from(err: ClinicError) -> Self {
        AppError(err)
    }
}

/// Scheduling failures flow through the core taxonomy before becoming
/// responses, so `?` works on engine results in handlers.
impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError(ClinicError::from(err))
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// Repository failures land here; they are reported as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ClinicError::Database(err))
    }
}

/// Transaction begin/commit errors from sqlx map to database errors as well.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError(ClinicError::Database(eyre::Report::new(err)))
    }
}
