use actix_web::error::{BlockingError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;
use tracing::error;

use crate::response::ApiResponse;

/// Every handler failure funnels through here and comes out as the JSON
/// envelope; nothing reaches the client as an unhandled error. Database and
/// other unexpected failures are logged server-side and answered with a
/// generic 500 message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database error")]
    Database(#[source] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(String),
    #[error("password hash error")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("token error")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("malformed stored document")]
    Document(#[from] serde_json::Error),
    #[error("internal error")]
    Internal,
}

impl From<diesel::result::Error> for ApiError {
    fn from(e: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match e {
            Error::NotFound => ApiError::NotFound("record not found".to_string()),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::Conflict("record already exists".to_string())
            }
            other => ApiError::Database(other),
        }
    }
}

impl From<BlockingError> for ApiError {
    fn from(_: BlockingError) -> Self {
        ApiError::Internal
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_)
            | ApiError::Pool(_)
            | ApiError::Hash(_)
            | ApiError::Document(_)
            | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            // A bad bearer token is an auth failure, not a server fault.
            ApiError::Token(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = ?self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(ApiResponse::<()>::failure(message))
    }
}

/// Keeps body-deserialization failures inside the envelope instead of
/// actix's default plain-text 400.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(err.to_string()).into()
}
