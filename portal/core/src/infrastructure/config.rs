// Copyright (c) 2026 Accord Digital
// SPDX-License-Identifier: AGPL-3.0
//! Portal configuration, bound from a YAML file with optional environment
//! overrides for secrets.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration for the portal service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    pub facade: FacadeConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub features: FeatureFlags,

    #[serde(default)]
    pub urls: ExternalUrls,
}

/// Facade API client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacadeConfig {
    /// Base address of the downstream facade API, e.g. `https://facade.internal`.
    pub base_url: String,

    #[serde(default = "defaults::facade_timeout_secs")]
    pub timeout_secs: u64,

    pub token: TokenConfig,

    #[serde(default)]
    pub endpoints: FacadeEndpoints,
}

impl FacadeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Client-credentials settings for acquiring facade bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    pub endpoint: String,
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Facade endpoint path segments, overridable per environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacadeEndpoints {
    #[serde(default = "defaults::user_accounts_path")]
    pub user_accounts: String,
    #[serde(default = "defaults::organisations_path")]
    pub organisations: String,
    #[serde(default = "defaults::companies_house_path")]
    pub companies_house: String,
}

impl Default for FacadeEndpoints {
    fn default() -> Self {
        Self {
            user_accounts: defaults::user_accounts_path(),
            organisations: defaults::organisations_path(),
            companies_house: defaults::companies_house_path(),
        }
    }
}

/// Session cookie and idle-timeout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "defaults::cookie_name")]
    pub cookie_name: String,
    #[serde(default = "defaults::idle_timeout_minutes")]
    pub idle_timeout_minutes: u64,
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_minutes * 60)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: defaults::cookie_name(),
            idle_timeout_minutes: defaults::idle_timeout_minutes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Swap the HTTP facade client for canned in-memory data (local development).
    #[serde(default)]
    pub use_mock_facade: bool,
    /// Expose the permission-delegation wizard.
    #[serde(default = "defaults::enabled")]
    pub manage_permissions_enabled: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            use_mock_facade: false,
            manage_permissions_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUrls {
    /// Where authenticated users with no portal account are sent to create one.
    #[serde(default = "defaults::account_creation_url")]
    pub account_creation: String,
    /// Where users land after signing out.
    #[serde(default = "defaults::signed_out_url")]
    pub signed_out: String,
}

impl Default for ExternalUrls {
    fn default() -> Self {
        Self {
            account_creation: defaults::account_creation_url(),
            signed_out: defaults::signed_out_url(),
        }
    }
}

impl PortalConfig {
    /// Load configuration from a YAML file. `PORTAL_FACADE_CLIENT_SECRET`
    /// overrides the file-provided secret so it can stay out of checked-in
    /// config.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: PortalConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        if let Ok(secret) = std::env::var("PORTAL_FACADE_CLIENT_SECRET") {
            config.facade.token.client_secret = secret;
        }

        Ok(config)
    }

    /// Configuration for running entirely in-process: mock facade, in-memory
    /// session store, localhost bind.
    pub fn local() -> Self {
        Self {
            bind_address: defaults::bind_address(),
            facade: FacadeConfig {
                base_url: "http://localhost:9091".to_string(),
                timeout_secs: defaults::facade_timeout_secs(),
                token: TokenConfig {
                    endpoint: "http://localhost:9091/token".to_string(),
                    client_id: "local".to_string(),
                    client_secret: String::new(),
                    scope: None,
                },
                endpoints: FacadeEndpoints::default(),
            },
            session: SessionConfig::default(),
            features: FeatureFlags {
                use_mock_facade: true,
                manage_permissions_enabled: true,
            },
            urls: ExternalUrls::default(),
        }
    }
}

mod defaults {
    pub fn bind_address() -> String {
        "127.0.0.1:8080".to_string()
    }

    pub fn facade_timeout_secs() -> u64 {
        30
    }

    pub fn cookie_name() -> String {
        "portal-session".to_string()
    }

    pub fn idle_timeout_minutes() -> u64 {
        20
    }

    pub fn enabled() -> bool {
        true
    }

    pub fn user_accounts_path() -> String {
        "/api/user-accounts".to_string()
    }

    pub fn organisations_path() -> String {
        "/api/organisations".to_string()
    }

    pub fn companies_house_path() -> String {
        "/api/companies-house".to_string()
    }

    pub fn account_creation_url() -> String {
        "https://account.example.gov/create-account".to_string()
    }

    pub fn signed_out_url() -> String {
        "/signed-out".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_fills_defaults() {
        let yaml = r#"
facade:
  base_url: "https://facade.internal"
  token:
    endpoint: "https://login.internal/token"
    client_id: "portal"
"#;
        let config: PortalConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.session.cookie_name, "portal-session");
        assert_eq!(config.session.idle_timeout(), Duration::from_secs(20 * 60));
        assert_eq!(config.facade.endpoints.user_accounts, "/api/user-accounts");
        assert!(config.features.manage_permissions_enabled);
        assert!(!config.features.use_mock_facade);
    }
}
