//! CLI configuration.

use aas_repository_client::ClientConfig;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Connection settings plus the password used to log in.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Client configuration
    pub client: ClientConfig,
    /// Password for `client.username`
    pub password: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::new("http://127.0.0.1:2234", "test"),
            password: String::new(),
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AAS_REPO_URL`: Repository server base URL
    /// - `AAS_REPO_USERNAME`: User to log in as
    /// - `AAS_REPO_PASSWORD`: Password of that user
    /// - `AAS_REPO_TIMEOUT_SECS`: Request timeout in seconds
    /// - `AAS_REPO_CA_CERT`: PEM CA certificate for self-signed servers
    /// - `AAS_REPO_CLIENT_CERT` / `AAS_REPO_CLIENT_KEY`: PEM client identity for mTLS
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("AAS_REPO_URL") {
            config.client.base_url = url;
        }

        if let Some(username) = lookup("AAS_REPO_USERNAME") {
            config.client.username = username;
        }

        if let Some(password) = lookup("AAS_REPO_PASSWORD") {
            config.password = password;
        }

        if let Some(secs) = lookup("AAS_REPO_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().context("Invalid AAS_REPO_TIMEOUT_SECS")?;
            config.client.timeout = Duration::from_secs(secs);
        }

        config.client.ca_cert_path = lookup("AAS_REPO_CA_CERT").map(PathBuf::from);
        config.client.client_cert_path = lookup("AAS_REPO_CLIENT_CERT").map(PathBuf::from);
        config.client.client_key_path = lookup("AAS_REPO_CLIENT_KEY").map(PathBuf::from);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = CliConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.client.base_url, "http://127.0.0.1:2234");
        assert_eq!(config.client.username, "test");
        assert!(config.password.is_empty());
        assert!(config.client.ca_cert_path.is_none());
    }

    #[test]
    fn env_overrides() {
        let config = CliConfig::from_lookup(lookup(&[
            ("AAS_REPO_URL", "https://repo.example.com"),
            ("AAS_REPO_USERNAME", "alice"),
            ("AAS_REPO_PASSWORD", "secret"),
            ("AAS_REPO_TIMEOUT_SECS", "5"),
            ("AAS_REPO_CA_CERT", "/etc/ssl/repo-ca.pem"),
        ]))
        .unwrap();

        assert_eq!(config.client.base_url, "https://repo.example.com");
        assert_eq!(config.client.username, "alice");
        assert_eq!(config.password, "secret");
        assert_eq!(config.client.timeout, Duration::from_secs(5));
        assert_eq!(
            config.client.ca_cert_path,
            Some(PathBuf::from("/etc/ssl/repo-ca.pem"))
        );
    }

    #[test]
    fn invalid_timeout() {
        let err = CliConfig::from_lookup(lookup(&[("AAS_REPO_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("AAS_REPO_TIMEOUT_SECS"));
    }
}
