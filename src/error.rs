//! Error types for gatekeeper operations

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

/// Gatekeeper-specific error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown validator driver: '{0}' (forgot to register it?)")]
    UnknownDriver(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("error getting the public key from the authentication server: {0}")]
    KeyFetch(String),

    #[error("{0}")]
    Provider(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status for this error.
    ///
    /// Malformed client input maps to 400, authentication failures to 401,
    /// authorization failures to 403 and everything upstream or internal
    /// to 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) | Error::Provider(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let code = self.status_code();
        let body = Json(serde_json::json!({
            "code": code.as_u16(),
            "message": self.to_string(),
        }));
        (code, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_status() {
        let err = Error::BadRequest("broken header".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unauthorized_status() {
        let err = Error::Unauthorized("token expired".to_string());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_provider_rejection_is_unauthorized() {
        let err = Error::Provider("invalid_grant".to_string());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_status() {
        let err = Error::Forbidden("user: john".to_string());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_infrastructure_errors_are_internal() {
        let err = Error::KeyFetch("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = Error::UnknownDriver("ldap".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_status() {
        let response = Error::Forbidden("user: jane".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_display_messages() {
        let err = Error::Unauthorized("unauthorized request: bad signature".to_string());
        assert_eq!(err.to_string(), "unauthorized request: bad signature");

        let err = Error::UnknownDriver("ldap".to_string());
        assert!(err.to_string().contains("'ldap'"));
    }
}
