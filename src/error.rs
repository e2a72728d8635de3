// HTTP API Error Types
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::GateDenial;
use crate::database::StoreError;
use crate::services::{AccountError, AdminError};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError(String),
    InvalidJson(String),
    InvalidId(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 500, profile saved but superuser flag not applied
    PrivilegeNotApplied { user_id: Uuid },

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_)
            | ApiError::ValidationError(_)
            | ApiError::InvalidJson(_)
            | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) | ApiError::PrivilegeNotApplied { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::ValidationError(msg)
            | ApiError::InvalidJson(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::InternalServerError(msg)
            | ApiError::ServiceUnavailable(msg) => msg.clone(),
            ApiError::InvalidId(raw) => format!("Invalid id: {raw}"),
            ApiError::PrivilegeNotApplied { .. } => {
                "User profile was updated but the superuser flag was not applied; retry the privilege change"
                    .to_string()
            }
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::InvalidId(_) => "INVALID_ID",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::PrivilegeNotApplied { .. } => "PRIVILEGE_NOT_APPLIED",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        });
        if let ApiError::PrivilegeNotApplied { user_id } = self {
            body["user_id"] = json!(user_id);
        }
        body
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => ApiError::not_found(format!("Not found: {msg}")),
            other => {
                // Don't expose internal store errors to clients
                tracing::error!(error = %other, "Store error");
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<GateDenial> for ApiError {
    fn from(denial: GateDenial) -> Self {
        match denial {
            GateDenial::Unauthenticated => ApiError::unauthorized("Authentication required"),
            GateDenial::MissingRole(_) | GateDenial::NotSuperuser => {
                ApiError::forbidden("Superuser privileges required")
            }
        }
    }
}

impl From<AdminError> for ApiError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::Validation(msg) => ApiError::ValidationError(msg),
            AdminError::InvalidId(raw) => ApiError::InvalidId(raw),
            AdminError::NotFound(msg) => ApiError::not_found(msg),
            AdminError::Forbidden(msg) => ApiError::forbidden(msg),
            AdminError::Hash(e) => {
                tracing::error!(error = %e, "Password hashing failed");
                ApiError::internal_server_error("Failed to process password")
            }
            AdminError::Store(e) => e.into(),
            AdminError::PrivilegeNotApplied { user_id, source } => {
                tracing::error!(%user_id, error = %source, "Superuser flag not applied after profile update");
                ApiError::PrivilegeNotApplied { user_id }
            }
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::RegistrationDisabled => ApiError::forbidden("Registration is disabled"),
            AccountError::DemoMode => ApiError::forbidden("Account deletion is disabled in demo mode"),
            AccountError::Validation(msg) => ApiError::ValidationError(msg),
            AccountError::InvalidCredentials => ApiError::unauthorized("Invalid email or password"),
            AccountError::Hash(e) => {
                tracing::error!(error = %e, "Password hashing failed");
                ApiError::internal_server_error("Failed to process password")
            }
            AccountError::Token(e) => {
                tracing::error!(error = %e, "Token generation failed");
                ApiError::internal_server_error("Failed to issue token")
            }
            AccountError::Store(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidJson(rejection.body_text())
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
