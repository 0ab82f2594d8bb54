//! Identity-provider driver contract and registry
//!
//! A [`Driver`] adapts one identity provider to the validation chain:
//! it verifies tokens, exchanges user credentials for tokens and renews
//! them. Drivers are registered by name in a [`DriverRegistry`] at
//! start-up and looked up during [`Validator::setup`].
//!
//! [`Validator::setup`]: crate::validator::Validator::setup

pub mod keycloak;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::claims::Claims;
use crate::error::Result;

/// A provider-issued token.
///
/// Closed tagged type: each provider variant owns its concrete token
/// representation, and the rest of the crate treats the value as opaque
/// apart from the bearer string.
#[derive(Debug, Clone)]
pub enum ProviderToken {
    Keycloak(keycloak::KeycloakToken),
}

impl ProviderToken {
    /// The string presented as the Bearer credential.
    pub fn bearer(&self) -> &str {
        match self {
            ProviderToken::Keycloak(token) => &token.id_token,
        }
    }
}

/// Outcome of a token validation.
///
/// A transport or structural failure is an `Err` on the driver call;
/// a well-formed rejection carries its human-readable reason here.
#[derive(Debug, Clone)]
pub enum TokenValidation {
    Valid(Claims),
    Invalid { reason: String },
}

impl TokenValidation {
    pub fn invalid(reason: impl Into<String>) -> Self {
        TokenValidation::Invalid {
            reason: reason.into(),
        }
    }
}

/// Provider-specific validate/obtain/renew/revoke contract.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Validate a token against the provider at `server_addr` for
    /// `client_id`.
    ///
    /// Network or structural failure is an `Err`; an invalid, expired or
    /// malformed token is `Ok(Invalid)` with the reason; success is
    /// `Ok(Valid)` with the decoded claims.
    async fn validate(
        &self,
        server_addr: &str,
        client_id: &str,
        token: &str,
    ) -> Result<TokenValidation>;

    /// Exchange user credentials for a token (password grant).
    async fn obtain(
        &self,
        server_addr: &str,
        username: &str,
        password: &str,
        client_id: &str,
    ) -> Result<ProviderToken>;

    /// Renew a previously obtained token.
    ///
    /// Returns the old token unchanged without a network call when it is
    /// still valid; otherwise performs a refresh-token grant.
    async fn renew(
        &self,
        server_addr: &str,
        old: &ProviderToken,
        client_id: &str,
    ) -> Result<ProviderToken>;

    /// Invalidate a token at the provider.
    ///
    /// Providers without a revocation flow no-op; revoke never fails.
    async fn revoke(&self, server_addr: &str, token: &ProviderToken);
}

/// Mapping from provider name to driver, populated at start-up.
pub struct DriverRegistry {
    drivers: Mutex<HashMap<String, Arc<dyn Driver>>>,
}

impl DriverRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            drivers: Mutex::new(HashMap::new()),
        }
    }

    /// A registry with all built-in drivers registered.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(keycloak::DRIVER_NAME, Arc::new(keycloak::KeycloakDriver::new()));
        registry
    }

    /// Register a driver under a name, overwriting any previous entry.
    pub fn register(&self, name: impl Into<String>, driver: Arc<dyn Driver>) {
        self.drivers.lock().unwrap().insert(name.into(), driver);
    }

    /// Look up a driver by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Driver>> {
        self.drivers.lock().unwrap().get(name).cloned()
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
