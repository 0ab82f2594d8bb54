//! Configuration parsing module
//!
//! Standardized configuration loading from TOML files: an `[auth]`
//! section selecting the driver and provider, and an optional `[authz]`
//! section carrying the access-control rules.
//!
//! # Example
//!
//! ```rust,ignore
//! use gatekeeper::config::load_config;
//!
//! let config = load_config("config.toml")?;
//! let validator = Validator::setup(&registry, config)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::authz::Policy;
use crate::error::{Error, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatekeeperConfig {
    /// Authentication section
    pub auth: AuthConfig,

    /// Authorization section; absent means authorization is disabled
    #[serde(default)]
    pub authz: Policy,
}

impl GatekeeperConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_config(path)
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Identity-provider driver name
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Provider server address (issuer)
    pub server_addr: String,

    /// Client identifier the service is registered as
    pub client_id: String,

    /// Accept HTTP Basic credentials and exchange them for tokens
    #[serde(default)]
    pub basic_enabled: bool,
}

fn default_driver() -> String {
    crate::driver::keycloak::DRIVER_NAME.to_string()
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GatekeeperConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read config file: {e}")))?;

    toml::from_str(&content).map_err(|e| Error::Config(format!("failed to parse TOML config: {e}")))
}
