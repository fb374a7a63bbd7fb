//! Transport seam between the repository client and the network.
//!
//! `RepositoryClient` only ever talks to a `Transport`. The production
//! implementation is `HttpTransport` (blocking `reqwest`); tests substitute an
//! in-memory transport to observe exactly what would be sent.

use crate::chunks::FileChunks;
use crate::config::ClientConfig;
use crate::error::ClientError;
use reqwest::blocking::{Body, Client};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{Cursor, Read};

/// Header name → value mapping.
pub type Headers = BTreeMap<String, String>;

/// HTTP verbs used by the repository API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET (the API sends bodies with GET requests too)
    Get,
    /// PUT
    Put,
    /// POST
    Post,
}

impl Method {
    /// Upper-case verb.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Put => Self::PUT,
            Method::Post => Self::POST,
        }
    }
}

/// Request body.
#[derive(Debug)]
pub enum RequestBody {
    /// No body
    Empty,
    /// Serialized JSON document
    Json(Vec<u8>),
    /// File content, streamed chunk by chunk
    Stream(FileChunks),
}

/// A single request to the repository server.
#[derive(Debug)]
pub struct Request {
    /// HTTP verb
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Headers owned by this request alone
    pub headers: Headers,
    /// Body
    pub body: RequestBody,
}

impl Request {
    /// Create a request without headers or body.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: RequestBody::Empty,
        }
    }

    /// Add all `headers`.
    #[must_use]
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Add one header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn json(mut self, body: Vec<u8>) -> Self {
        self.body = RequestBody::Json(body);
        self.header("content-type", "application/json")
    }

    /// Attach a streamed body.
    #[must_use]
    pub fn stream(mut self, chunks: FileChunks) -> Self {
        self.body = RequestBody::Stream(chunks);
        self.header("content-type", "application/octet-stream")
    }
}

/// Response from the repository server.
///
/// The body is left unread until the caller consumes it, so downloads can be
/// streamed to disk.
pub struct Response {
    /// HTTP status code
    pub status: u16,
    body: Box<dyn Read + Send>,
}

impl Response {
    /// Create a response from a status and a body reader.
    #[must_use]
    pub fn new(status: u16, body: impl Read + Send + 'static) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }

    /// Create a response with an in-memory body.
    #[must_use]
    pub fn from_bytes(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, Cursor::new(body.into()))
    }

    /// The API treats exactly 200 as success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Read the whole body.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the body cannot be read.
    pub fn bytes(mut self) -> Result<Vec<u8>, ClientError> {
        let mut buf = Vec::new();
        self.body
            .read_to_end(&mut buf)
            .map_err(|e| ClientError::Transport(format!("failed to read response body: {e}")))?;
        Ok(buf)
    }

    /// Read the whole body as text, replacing invalid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the body cannot be read.
    pub fn text(self) -> Result<String, ClientError> {
        let bytes = self.bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Take the body as a reader.
    #[must_use]
    pub fn into_reader(self) -> Box<dyn Read + Send> {
        self.body
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Sends requests to the repository server.
pub trait Transport {
    /// Perform one round trip.
    ///
    /// A non-200 status is not an error at this level.
    ///
    /// # Errors
    ///
    /// Returns a transport error on network-level failure.
    fn send(&self, request: Request) -> Result<Response, ClientError>;
}

/// `Transport` over a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the HTTP client with the configured timeout and TLS material.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created, or if TLS
    /// certificate files cannot be read or parsed.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder().timeout(config.timeout);

        if config.base_url.starts_with("https://") {
            builder = builder.use_rustls_tls();

            if let Some(ca_path) = &config.ca_cert_path {
                let pem = fs::read(ca_path).map_err(|e| {
                    ClientError::Init(format!(
                        "failed to read CA certificate {}: {e}",
                        ca_path.display()
                    ))
                })?;
                let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                    ClientError::Init(format!("failed to parse CA certificate: {e}"))
                })?;
                builder = builder.add_root_certificate(cert);
                tracing::debug!(ca_path = %ca_path.display(), "Loaded custom CA certificate");
            }

            if let (Some(cert_path), Some(key_path)) =
                (&config.client_cert_path, &config.client_key_path)
            {
                let mut identity_pem = fs::read(cert_path).map_err(|e| {
                    ClientError::Init(format!(
                        "failed to read client certificate {}: {e}",
                        cert_path.display()
                    ))
                })?;
                let key_pem = fs::read(key_path).map_err(|e| {
                    ClientError::Init(format!(
                        "failed to read client key {}: {e}",
                        key_path.display()
                    ))
                })?;
                identity_pem.extend_from_slice(&key_pem);

                let identity = reqwest::Identity::from_pem(&identity_pem).map_err(|e| {
                    ClientError::Init(format!("failed to create client identity: {e}"))
                })?;
                builder = builder.identity(identity);
                tracing::debug!(cert_path = %cert_path.display(), "Loaded client certificate");
            }
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> Result<Response, ClientError> {
        let mut builder = self.client.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder.body(bytes),
            RequestBody::Stream(chunks) => builder.body(Body::new(chunks.into_reader())),
        };

        let response = builder
            .send()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Response::new(response.status().as_u16(), response))
    }
}
