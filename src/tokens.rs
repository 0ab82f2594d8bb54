//! Token obtainment clients for the Basic scheme and their cache
//!
//! Each Basic credential pair gets a [`TokenClient`] that performs the
//! password grant once and keeps the resulting token for reuse; the
//! clients live in a bounded [`TokenCache`] keyed by the raw credential
//! string from the Authorization header.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::driver::{Driver, ProviderToken};
use crate::error::Result;

/// Default bound on distinct credential pairs held at once
pub const DEFAULT_CACHE_CAPACITY: u64 = 1024;

/// Default idle lifetime of a cached client
pub const DEFAULT_CACHE_IDLE: Duration = Duration::from_secs(3600);

/// Obtains and holds a provider token for one credential pair.
pub struct TokenClient {
    driver: Arc<dyn Driver>,
    server_addr: String,
    username: String,
    password: String,
    client_id: String,
    token: RwLock<Option<ProviderToken>>,
}

impl TokenClient {
    pub fn new(
        driver: Arc<dyn Driver>,
        server_addr: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            driver,
            server_addr: server_addr.into(),
            username: username.into(),
            password: password.into(),
            client_id: client_id.into(),
            token: RwLock::new(None),
        }
    }

    /// The held token, obtained on first use.
    pub async fn token(&self) -> Result<ProviderToken> {
        if let Some(token) = self.token.read().await.clone() {
            return Ok(token);
        }

        let mut slot = self.token.write().await;
        if let Some(token) = slot.clone() {
            return Ok(token);
        }

        let token = self
            .driver
            .obtain(
                &self.server_addr,
                &self.username,
                &self.password,
                &self.client_id,
            )
            .await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Renew the held token in place.
    ///
    /// Falls back to a fresh obtain when nothing is held yet.
    pub async fn renew(&self) -> Result<ProviderToken> {
        let mut slot = self.token.write().await;
        let renewed = match &*slot {
            Some(old) => {
                self.driver
                    .renew(&self.server_addr, old, &self.client_id)
                    .await?
            }
            None => {
                self.driver
                    .obtain(
                        &self.server_addr,
                        &self.username,
                        &self.password,
                        &self.client_id,
                    )
                    .await?
            }
        };
        *slot = Some(renewed.clone());
        Ok(renewed)
    }
}

/// Bounded concurrent cache of [`TokenClient`]s keyed by the raw Basic
/// credential string.
pub struct TokenCache {
    clients: moka::future::Cache<String, Arc<TokenClient>>,
}

impl TokenCache {
    pub fn new(max_capacity: u64, idle: Duration) -> Self {
        let clients = moka::future::Cache::builder()
            .max_capacity(max_capacity)
            .time_to_idle(idle)
            .build();
        Self { clients }
    }

    pub async fn get(&self, credentials: &str) -> Option<Arc<TokenClient>> {
        self.clients.get(credentials).await
    }

    pub async fn insert(&self, credentials: String, client: Arc<TokenClient>) {
        self.clients.insert(credentials, client).await;
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_IDLE)
    }
}
