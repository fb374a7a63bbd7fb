//! Client configuration.

use crate::chunks::DEFAULT_CHUNK_SIZE;
use crate::error::ClientError;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Repository client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the repository server (e.g., <http://127.0.0.1:2234>)
    pub base_url: String,
    /// User to log in as
    pub username: String,
    /// Request timeout, applied to every call including file transfers
    pub timeout: Duration,
    /// Size of the chunks an upload is streamed in
    pub chunk_size: usize,
    /// Custom CA certificate path for self-signed server certs (PEM format)
    pub ca_cert_path: Option<PathBuf>,
    /// Client certificate path for mTLS authentication (PEM format)
    pub client_cert_path: Option<PathBuf>,
    /// Client private key path for mTLS authentication (PEM format)
    pub client_key_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:2234".to_string(),
            username: String::new(),
            timeout: Duration::from_secs(30),
            chunk_size: DEFAULT_CHUNK_SIZE,
            ca_cert_path: None,
            client_cert_path: None,
            client_key_path: None,
        }
    }
}

impl ClientConfig {
    /// Configuration for `username` on the server at `base_url`, defaults elsewhere.
    #[must_use]
    pub fn new(base_url: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            ..Default::default()
        }
    }

    /// Check the configuration and return the normalized base URL.
    ///
    /// The returned URL has no trailing slash so endpoint paths can be
    /// appended directly.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is not an absolute http(s) URL or the
    /// chunk size is zero.
    pub fn validate(&self) -> Result<String, ClientError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Init(format!("invalid base URL {}: {e}", self.base_url)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Init(format!(
                "unsupported URL scheme: {}",
                url.scheme()
            )));
        }

        if self.chunk_size == 0 {
            return Err(ClientError::Init("chunk size must be non-zero".to_string()));
        }

        Ok(self.base_url.trim_end_matches('/').to_string())
    }
}
