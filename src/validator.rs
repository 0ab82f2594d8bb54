//! Request validation chain
//!
//! The [`Validator`] orchestrates header parsing, scheme dispatch, token
//! resolution, driver validation and the authorization check. Outcomes
//! map onto HTTP: 400 for malformed input, 401 for failed
//! authentication, 403 for insufficient privilege, 500 for provider or
//! infrastructure faults.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::sync::RwLock;

use crate::authz::Policy;
use crate::claims::Claims;
use crate::config::GatekeeperConfig;
use crate::driver::{Driver, DriverRegistry, TokenValidation};
use crate::error::{Error, Result};
use crate::tokens::{TokenCache, TokenClient};

/// Validates requests against an identity provider and an optional
/// access-control policy.
pub struct Validator {
    driver: Arc<dyn Driver>,
    driver_name: String,
    server_addr: String,
    client_id: String,
    basic_enabled: bool,
    policy: RwLock<Arc<Policy>>,
    clients: TokenCache,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("driver_name", &self.driver_name)
            .field("server_addr", &self.server_addr)
            .field("client_id", &self.client_id)
            .field("basic_enabled", &self.basic_enabled)
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Configure a validator from the registry and configuration.
    ///
    /// The named driver must already be registered.
    pub fn setup(registry: &DriverRegistry, config: GatekeeperConfig) -> Result<Self> {
        let driver = registry
            .lookup(&config.auth.driver)
            .ok_or_else(|| Error::UnknownDriver(config.auth.driver.clone()))?;

        Ok(Self {
            driver,
            driver_name: config.auth.driver,
            server_addr: config.auth.server_addr,
            client_id: config.auth.client_id,
            basic_enabled: config.auth.basic_enabled,
            policy: RwLock::new(Arc::new(config.authz)),
            clients: TokenCache::default(),
        })
    }

    /// Name of the driver backing this validator.
    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    /// Atomically replace the access-control policy.
    pub async fn replace_policy(&self, policy: Policy) {
        *self.policy.write().await = Arc::new(policy);
    }

    async fn policy(&self) -> Arc<Policy> {
        self.policy.read().await.clone()
    }

    /// Run the full validation chain for one request.
    ///
    /// `authorization` is the raw Authorization header value, if any.
    /// Returns the validated identity, or the rejection to send.
    pub async fn validate_request(
        &self,
        authorization: Option<&str>,
        path: &str,
        method: &str,
    ) -> Result<Claims> {
        let Some(authorization) = authorization else {
            let policy = self.policy().await;
            if policy.enabled {
                let anonymous = Claims::anonymous();
                if policy.authorized(path, method, &anonymous) {
                    return Ok(anonymous);
                }
            }
            return Err(Error::Unauthorized("unauthorized request".to_string()));
        };

        let Some((scheme, value)) = authorization.split_once(' ') else {
            return Err(Error::BadRequest(
                "invalid format for Authorization header value".to_string(),
            ));
        };

        let token = match scheme {
            "Bearer" => value.to_string(),
            "Basic" if self.basic_enabled => self.basic_auth(value).await?,
            _ => {
                return Err(Error::Unauthorized(format!(
                    "unsupported Authorization scheme: {scheme}"
                )))
            }
        };

        self.validation_chain(&token, path, method).await
    }

    /// Validate a token directly, without the HTTP header handling.
    pub async fn validate_token(&self, token: &str) -> Result<TokenValidation> {
        self.driver
            .validate(&self.server_addr, &self.client_id, token)
            .await
    }

    /// Validate a token and check the policy.
    async fn validation_chain(&self, token: &str, path: &str, method: &str) -> Result<Claims> {
        let claims = match self
            .validate_token(token)
            .await
            .map_err(|e| Error::Validation(e.to_string()))?
        {
            TokenValidation::Valid(claims) => claims,
            TokenValidation::Invalid { reason } if reason.is_empty() => {
                return Err(Error::Unauthorized("unauthorized request".to_string()))
            }
            TokenValidation::Invalid { reason } => {
                return Err(Error::Unauthorized(format!("unauthorized request: {reason}")))
            }
        };

        let policy = self.policy().await;
        if policy.enabled && !policy.authorized(path, method, &claims) {
            return Err(Error::Forbidden(format!(
                "access denied for user: {}, group membership: {:?}",
                claims.username, claims.groups
            )));
        }

        Ok(claims)
    }

    /// Resolve Basic credentials into a bearer token.
    ///
    /// Tokens are obtained once per credential pair and reused; a token
    /// that no longer validates is renewed once before the request fails.
    async fn basic_auth(&self, credentials: &str) -> Result<String> {
        let decoded = STANDARD.decode(credentials).map_err(|e| {
            Error::BadRequest(format!("basic auth: invalid encoding of credentials: {e}"))
        })?;
        let decoded = String::from_utf8(decoded).map_err(|e| {
            Error::BadRequest(format!("basic auth: invalid encoding of credentials: {e}"))
        })?;

        let client = match self.clients.get(credentials).await {
            Some(client) => client,
            None => {
                let Some((username, password)) = decoded.split_once(':') else {
                    return Err(Error::BadRequest(
                        "basic auth: invalid format for credentials".to_string(),
                    ));
                };
                let client = Arc::new(TokenClient::new(
                    self.driver.clone(),
                    self.server_addr.clone(),
                    username,
                    password,
                    self.client_id.clone(),
                ));
                self.clients
                    .insert(credentials.to_string(), client.clone())
                    .await;
                client
            }
        };

        let token = client
            .token()
            .await
            .map_err(|e| Error::Unauthorized(format!("basic auth: unable to obtain token: {e}")))?;

        let outcome = self
            .validate_token(token.bearer())
            .await
            .map_err(|e| Error::Validation(format!("basic auth: {e}")))?;
        match outcome {
            TokenValidation::Valid(_) => Ok(token.bearer().to_string()),
            TokenValidation::Invalid { reason } => {
                tracing::debug!("cached token no longer validates ({reason}), renewing");
                let renewed = client.renew().await.map_err(|e| {
                    Error::Unauthorized(format!("basic auth: unable to renew token: {e}"))
                })?;
                Ok(renewed.bearer().to_string())
            }
        }
    }
}
