//! HTTP middleware wrapping a downstream handler
//!
//! [`AuthLayer`] runs the validation chain on every request. A validated
//! request proceeds unchanged to the wrapped service with the decoded
//! [`Claims`] inserted into its extensions; a rejected request is
//! short-circuited with the structured JSON error
//! `{"code": <status>, "message": "<reason>"}`.
//!
//! # Example
//!
//! ```ignore
//! use axum::{routing::get, Router};
//! use gatekeeper::middleware::AuthLayer;
//!
//! let app = Router::new()
//!     .route("/res", get(handler))
//!     .layer(AuthLayer::new(validator));
//! ```

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use http::header::AUTHORIZATION;
use std::sync::Arc;
use tower::Layer;
use tower::Service;

use crate::error::Error;
use crate::validator::Validator;

/// Middleware layer enforcing authentication and authorization
#[derive(Clone)]
pub struct AuthLayer {
    validator: Arc<Validator>,
}

impl AuthLayer {
    /// Create a new AuthLayer around a configured validator
    pub fn new(validator: Arc<Validator>) -> Self {
        Self { validator }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            validator: self.validator.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    validator: Arc<Validator>,
}

impl<S> Service<Request> for AuthService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        let inner = self.inner.clone();
        let mut inner = inner;
        let validator = self.validator.clone();

        Box::pin(async move {
            // Requests with a non-UTF-8 header value are treated the same
            // as requests with a malformed one.
            let authorization = match request.headers().get(AUTHORIZATION) {
                Some(value) => match value.to_str() {
                    Ok(value) => Some(value.to_string()),
                    Err(_) => {
                        let err = Error::BadRequest(
                            "invalid format for Authorization header value".to_string(),
                        );
                        return Ok(err.into_response());
                    }
                },
                None => None,
            };
            let path = request.uri().path().to_string();
            let method = request.method().as_str().to_string();

            match validator
                .validate_request(authorization.as_deref(), &path, &method)
                .await
            {
                Ok(claims) => {
                    request.extensions_mut().insert(claims);
                    inner.call(request).await
                }
                Err(err) => {
                    tracing::debug!("rejected {} {}: {}", method, path, err);
                    Ok(err.into_response())
                }
            }
        })
    }
}
