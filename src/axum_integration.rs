//! Axum integration helpers
//!
//! This module provides utilities for working with the validated
//! identity inside axum handlers:
//! - Authorization header access
//! - `FromRequestParts` extractor for [`Claims`]
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{routing::get, Router};
//! use gatekeeper::axum_integration::ClaimsExtractor;
//!
//! async fn protected_handler(claims: ClaimsExtractor) -> String {
//!     format!("Hello, {}!", claims.username)
//! }
//!
//! let app = Router::new()
//!     .route("/protected", get(protected_handler));
//! ```

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
};
use std::ops::Deref;

use crate::claims::Claims;

/// Read the raw Authorization header value, if it is present and valid
/// UTF-8.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Axum extractor for the validated identity
///
/// Retrieves [`Claims`] from the request extensions. The claims are
/// inserted by [`AuthLayer`] before the handler runs; using the
/// extractor on an unprotected route rejects with 401.
///
/// [`AuthLayer`]: crate::middleware::AuthLayer
#[derive(Debug, Clone)]
pub struct ClaimsExtractor(pub Claims);

impl Deref for ClaimsExtractor {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Claims> for ClaimsExtractor {
    fn from(claims: Claims) -> Self {
        Self(claims)
    }
}

impl ClaimsExtractor {
    /// Get the inner Claims
    pub fn into_inner(self) -> Claims {
        self.0
    }
}

impl<S> FromRequestParts<S> for ClaimsExtractor
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(ClaimsExtractor)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
