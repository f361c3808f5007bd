use crate::models::enum_types::AccountType;
use crate::utility::format_minor;
use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::r2d2;
use http::StatusCode;
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

#[derive(Debug)]
pub enum AuthError {
    MissingHeader,
    InvalidFormat,
    InvalidToken(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingHeader => write!(f, "Authorization header required"),
            AuthError::InvalidFormat => write!(f, "Invalid Authorization format"),
            AuthError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Database(diesel::result::Error),
    DatabaseConnection(String),
    Bcrypt(bcrypt::BcryptError),
    Validation(validator::ValidationErrors),
    BadRequest(String),
    Auth(AuthError),
    Token(String),
    InvalidAmount(String),
    InvalidPin(String),
    ProfileNotFound,
    InsufficientFunds {
        account_type: AccountType,
        available: i64,
    },
    RecipientNotFound(String),
    SelfTransferNotAllowed,
    Forbidden(String),
    NotFound(String),
    NotPending(String),
    PartialFailure(String),
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Database(e) => write!(f, "Database error: {}", e),
            ApiError::DatabaseConnection(e) => write!(f, "Database connection error: {}", e),
            ApiError::Bcrypt(e) => write!(f, "Hashing error: {}", e),
            ApiError::Validation(e) => write!(f, "Validation error: {}", e),
            ApiError::BadRequest(msg) => write!(f, "{}", msg),
            ApiError::Auth(e) => write!(f, "Unauthorized: {}", e),
            ApiError::Token(e) => write!(f, "Token error: {}", e),
            ApiError::InvalidAmount(msg) => write!(f, "Invalid amount: {}", msg),
            ApiError::InvalidPin(msg) => write!(f, "Invalid transfer PIN: {}", msg),
            ApiError::ProfileNotFound => write!(f, "Profile not found"),
            ApiError::InsufficientFunds {
                account_type,
                available,
            } => write!(
                f,
                "Insufficient {} balance. Available: ${}",
                account_type,
                format_minor(*available)
            ),
            ApiError::RecipientNotFound(msg) => write!(f, "Recipient not found: {}", msg),
            ApiError::SelfTransferNotAllowed => write!(f, "Cannot transfer to yourself"),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "{} not found", msg),
            ApiError::NotPending(msg) => write!(f, "{} is not pending", msg),
            ApiError::PartialFailure(msg) => write!(f, "Operation partially failed: {}", msg),
            ApiError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Database(e) => Some(e),
            ApiError::Bcrypt(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Database(diesel::result::Error::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Database(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            )) => StatusCode::CONFLICT,
            ApiError::Database(_)
            | ApiError::DatabaseConnection(_)
            | ApiError::Bcrypt(_)
            | ApiError::Token(_)
            | ApiError::PartialFailure(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_)
            | ApiError::BadRequest(_)
            | ApiError::InvalidAmount(_)
            | ApiError::InvalidPin(_)
            | ApiError::RecipientNotFound(_)
            | ApiError::SelfTransferNotAllowed => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::ProfileNotFound | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotPending(_) => StatusCode::CONFLICT,
        }
    }

    /// Message safe to hand back to a client. Storage internals stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Database(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            )) => "Duplicate record".to_string(),
            ApiError::Database(_) | ApiError::DatabaseConnection(_) => {
                "Storage temporarily unavailable".to_string()
            }
            ApiError::Bcrypt(_) => "PIN verification error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(err: r2d2::Error) -> Self {
        ApiError::DatabaseConnection(err.to_string())
    }
}

impl From<r2d2::PoolError> for ApiError {
    fn from(err: r2d2::PoolError) -> Self {
        ApiError::DatabaseConnection(err.to_string())
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        ApiError::Database(err)
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::Bcrypt(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<String>,
}

impl From<&ApiError> for ApiErrorResponse {
    fn from(err: &ApiError) -> Self {
        let available = match err {
            ApiError::InsufficientFunds { available, .. } => Some(format_minor(*available)),
            _ => None,
        };

        Self {
            success: false,
            error: err.public_message(),
            available,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(ApiErrorResponse::from(&self))).into_response()
    }
}
