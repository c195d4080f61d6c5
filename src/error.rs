/// Error signal raised by user operations and turned into HTTP responses
use axum::{
    Json,
    extract::rejection::{BytesRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::StoreError;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or malformed request data.
    #[error("{0}")]
    InvalidInput(String),

    /// Username already taken.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// Store failure; carries the driver message unchanged.
    #[error("{0}")]
    Persistence(String),

    /// Request refused by an axum extractor; keeps axum's status.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::InvalidInput(message.into())
    }

    pub fn user_not_found() -> Self {
        ApiError::NotFound("User not found".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::InvalidInput(msg)
            | ApiError::Conflict(msg)
            | ApiError::NotFound(msg)
            | ApiError::Persistence(msg)
            | ApiError::Rejected { message: msg, .. } => msg,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Persistence(err.0)
    }
}

macro_rules! rejection_into_api_error {
    ($($rejection:ty),*) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    ApiError::Rejected {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    }
                }
            }
        )*
    };
}

rejection_into_api_error!(BytesRejection, PathRejection, QueryRejection);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("{}: {}", status, self.message());
        } else {
            tracing::debug!("{}: {}", status, self.message());
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "message": self.message(),
        }));

        (status, body).into_response()
    }
}
