//! # Gatekeeper
//!
//! Pluggable OIDC authentication and rule-based authorization middleware
//! for axum services.
//!
//! A request passes through the validation chain: the Authorization
//! header is parsed, Bearer tokens are validated directly while Basic
//! credentials are transparently exchanged for a provider token (cached
//! and renewed as needed), and the resulting identity is checked against
//! a declarative, path-hierarchical access-control policy.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use axum::{routing::get, Router};
//! use gatekeeper::{AuthLayer, DriverRegistry, GatekeeperConfig, Validator};
//!
//! let registry = DriverRegistry::with_defaults();
//! let config = GatekeeperConfig::load("config.toml")?;
//! let validator = Arc::new(Validator::setup(&registry, config)?);
//!
//! let app = Router::new()
//!     .route("/res", get(handler))
//!     .layer(AuthLayer::new(validator));
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod authz;
pub mod axum_integration;
pub mod claims;
pub mod config;
pub mod driver;
pub mod middleware;
pub mod tokens;
pub mod validator;

// Re-export commonly used types at crate root for convenience
pub use crate::authz::{Policy, Rule};
pub use crate::axum_integration::ClaimsExtractor;
pub use crate::claims::Claims;
pub use crate::config::{AuthConfig, GatekeeperConfig};
pub use crate::driver::{Driver, DriverRegistry, ProviderToken, TokenValidation};
pub use crate::middleware::AuthLayer;
pub use crate::validator::Validator;
