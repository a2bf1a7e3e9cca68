//! API response helpers

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;

use crate::service;

/// Hold data for a failed API interaction
///
/// Every error renders as `{"error": "<message>"}` with the matching
/// status code
pub struct Error {
    status_code: StatusCode,
    message: String,
}

impl Error {
    pub fn bad_request<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code: StatusCode::BAD_REQUEST,
            message: message.to_string(),
        }
    }

    pub fn not_found<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code: StatusCode::NOT_FOUND,
            message: message.to_string(),
        }
    }

    pub fn conflict<M>(message: M) -> Self
    where
        M: ToString,
    {
        Self {
            status_code: StatusCode::CONFLICT,
            message: message.to_string(),
        }
    }

    pub fn internal_server_error() -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            message: String::from("Internal server error"),
        }
    }
}

impl From<service::Error> for Error {
    fn from(err: service::Error) -> Self {
        match err {
            service::Error::Validation(message) => Self::bad_request(message),
            service::Error::Conflict => Self::conflict("Code already exists"),
            service::Error::NotFound => Self::not_found("Not found"),
            service::Error::Internal(message) => {
                tracing::error!("Storage failure: {message}");

                Self::internal_server_error()
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorWrapper {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code,
            Json(ErrorWrapper {
                error: self.message,
            }),
        )
            .into_response()
    }
}
