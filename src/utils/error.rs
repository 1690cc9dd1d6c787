use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

const GENERIC_FAILURE: &str =
    "An error occurred while processing your request. Please try again later.";

#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed request input.
    Validation(String),
    /// An account with the same email already exists.
    Conflict(String),
    NotFound(String),
    Unauthorized(String),
    /// The analysis API answered with a non-success status; holds its body.
    Upstream(String),
    /// The analysis API could not be reached or its body could not be read.
    Analysis(String),
    /// The analysis API answered 2xx but without the expected fields.
    UnexpectedFormat(String),
    DatabaseError(String),
    Internal(String),
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::UnexpectedFormat(msg) => msg.clone(),
            AppError::Upstream(_) => "Invalid request".to_string(),
            AppError::Analysis(_) => "Something went wrong".to_string(),
            AppError::DatabaseError(_) | AppError::Internal(_) => GENERIC_FAILURE.to_string(),
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            AppError::Upstream(body) => Some(body.clone()),
            AppError::Analysis(reason) => Some(reason.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Upstream(body) => write!(f, "Analysis API rejected request: {}", body),
            AppError::Analysis(msg) => write!(f, "Analysis error: {}", msg),
            AppError::UnexpectedFormat(msg) => write!(f, "Analysis response rejected: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) | AppError::Upstream(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Analysis(_)
            | AppError::UnexpectedFormat(_)
            | AppError::DatabaseError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("❌ {} -> {}", status.as_u16(), self);
        } else {
            log::warn!("⚠️  {} -> {}", status.as_u16(), self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: true,
            message: self.public_message(),
            details: self.details(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("Password hashing failed: {}", e))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        AppError::Internal(format!("Token signing failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_upstream_error_carries_body_text() {
        let (status, body) = body_of(AppError::Upstream("quota exceeded".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "Invalid request");
        assert_eq!(body["details"], "quota exceeded");
    }

    #[actix_web::test]
    async fn test_database_error_is_redacted() {
        let (status, body) =
            body_of(AppError::DatabaseError("connection refused 10.0.0.3".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], GENERIC_FAILURE);
        assert!(body.get("details").is_none());
    }

    #[actix_web::test]
    async fn test_unexpected_format_message_is_public() {
        let (status, body) = body_of(AppError::UnexpectedFormat(
            "Unexpected response format from Lighthouse API".to_string(),
        ))
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Unexpected response format from Lighthouse API");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Analysis("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
