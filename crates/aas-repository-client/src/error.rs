//! Error types for the repository client.

use aas_repository_model::CodecError;
use std::path::PathBuf;

/// Errors that can occur with the repository client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    /// Client initialization failed
    #[error("client init error: {0}")]
    Init(String),
    /// Network-level failure (connection refused, DNS, timeout, broken body)
    #[error("transport error: {0}")]
    Transport(String),
    /// Server answered a data endpoint with a status other than 200
    #[error("could not {context} on server {uri} (status {status}): {body}")]
    Server {
        /// HTTP status code
        status: u16,
        /// What was attempted, including the identifier or path involved
        context: String,
        /// Base URI of the server
        uri: String,
        /// Raw response body
        body: String,
    },
    /// A local precondition failed before anything was sent
    #[error(transparent)]
    LocalValidation(#[from] LocalValidationError),
    /// Login did not produce a token
    #[error(transparent)]
    Login(#[from] LoginError),
    /// Request or response body could not be (de)serialized
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Reading or writing a local file failed
    #[error("I/O error on {}: {}", .path.display(), .message)]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error message
        message: String,
    },
}

impl ClientError {
    /// HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Login(LoginError::Rejected { status, .. }) => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Whether the server refused the request for lack of a valid token.
    ///
    /// Tokens are not refreshed automatically; callers seeing this should
    /// log in again and retry.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Local precondition failures, raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocalValidationError {
    /// Path does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// Path exists but is not a regular file
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
}

/// Login failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// Server refused the credentials
    #[error("login rejected (status {status}): {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },
    /// Response carried no usable `token` field
    #[error("login response has no token field")]
    MissingToken,
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
