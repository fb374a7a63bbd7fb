//! Repository client.
//!
//! Every operation is one blocking round trip; nothing is retried.
//!
//! There are two failure contracts:
//!
//! - **fetch/mutate** (`get_identifiable`, `modify_identifiable`,
//!   `add_identifiable`, `get_file`, `add_file`): a non-200 status is a
//!   `ClientError::Server`, or `Ok(None)` when called with `failsafe = true`.
//! - **query** (`query_semantic_id`): a non-200 status degrades to an empty
//!   result list.
//!
//! Transport, codec and local I/O errors are returned in both cases.
//!
//! `login` needs `&mut self`; all other operations take `&self`. Sharing one
//! client between threads therefore needs external locking around `login`.

use crate::chunks::FileChunks;
use crate::config::ClientConfig;
use crate::error::{ClientError, LocalValidationError, LoginError, Result};
use crate::query::{MatchOptions, SemanticQueryRequest, SemanticQueryResult};
use crate::transport::{Headers, HttpTransport, Method, Request, Response, Transport};
use aas_repository_model::{codec, Identifiable, Identifier, Key};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Deserialize;
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Endpoint paths, relative to the base URL.
pub mod endpoints {
    /// Basic-auth login, answers with a token
    pub const LOGIN: &str = "/login";
    /// Fetch one Identifiable
    pub const GET_IDENTIFIABLE: &str = "/get_identifiable";
    /// Replace an existing Identifiable
    pub const MODIFY_IDENTIFIABLE: &str = "/modify_identifiable";
    /// Create a new Identifiable
    pub const ADD_IDENTIFIABLE: &str = "/add_identifiable";
    /// Find Identifiables by semantic id
    pub const QUERY_SEMANTIC_ID: &str = "/query_semantic_id";
    /// Download a file
    pub const GET_FILE: &str = "/get_fmu";
    /// Upload a file
    pub const POST_FILE: &str = "/post_file";
}

/// Header carrying the session token.
pub const AUTH_TOKEN_HEADER: &str = "x-access-tokens";

/// Header carrying the base name of an uploaded file.
pub const FILE_NAME_HEADER: &str = "name";

/// Escaped in the upload name besides non-ASCII bytes. `%` is included so the
/// encoding stays reversible.
const UPLOAD_NAME_ESCAPE: &AsciiSet = &CONTROLS.add(b'%');

/// Token and the headers derived from it. Replaced as a whole, never edited.
#[derive(Debug, Clone)]
struct Session {
    token: String,
    auth_headers: Headers,
}

impl Session {
    fn new(token: String) -> Self {
        let mut auth_headers = Headers::new();
        auth_headers.insert(AUTH_TOKEN_HEADER.to_string(), token.clone());
        Self {
            token,
            auth_headers,
        }
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// Client for an AAS repository server.
#[derive(Debug)]
pub struct RepositoryClient<T = HttpTransport> {
    transport: T,
    base_url: String,
    username: String,
    chunk_size: usize,
    session: Option<Session>,
}

impl RepositoryClient<HttpTransport> {
    /// Create a client talking HTTP to `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> RepositoryClient<T> {
    /// Create a client on top of a custom transport.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid.
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self> {
        let base_url = config.validate()?;
        Ok(Self {
            transport,
            base_url,
            username: config.username.clone(),
            chunk_size: config.chunk_size,
            session: None,
        })
    }

    /// Base URL of the server, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// User this client logs in as.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Token of the current session, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Headers authenticating a request. Empty before login.
    #[must_use]
    pub fn auth_headers(&self) -> Headers {
        self.session
            .as_ref()
            .map(|s| s.auth_headers.clone())
            .unwrap_or_default()
    }

    /// Whether a login has succeeded.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Log in and keep the returned token for subsequent calls.
    ///
    /// On failure the previous session, if any, is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `LoginError::Rejected` if the server refuses the credentials,
    /// `LoginError::MissingToken` if the response has no token, or a
    /// transport error.
    pub fn login(&mut self, password: &str) -> Result<()> {
        let credentials = STANDARD.encode(format!("{}:{password}", self.username));
        let request = Request::new(Method::Get, self.url(endpoints::LOGIN))
            .header("authorization", format!("Basic {credentials}"));

        tracing::debug!(username = %self.username, url = %request.url, "GET login");

        let response = self.transport.send(request)?;
        if !response.is_ok() {
            let status = response.status;
            return Err(LoginError::Rejected {
                status,
                body: response.text().unwrap_or_default(),
            }
            .into());
        }

        let body = response.bytes()?;
        let LoginResponse { token } =
            codec::decode(&body).map_err(|_| LoginError::MissingToken)?;

        self.session = Some(Session::new(token));
        tracing::info!(username = %self.username, server = %self.base_url, "Logged in");
        Ok(())
    }

    /// Fetch an Identifiable by its identifier.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Server` on a non-200 status unless `failsafe` is
    /// set, in which case `Ok(None)` is returned instead. Transport and
    /// decoding errors are always returned.
    pub fn get_identifiable<I: Identifiable>(
        &self,
        identifier: &Identifier,
        failsafe: bool,
    ) -> Result<Option<I>> {
        let request = self
            .authed_request(Method::Get, endpoints::GET_IDENTIFIABLE)
            .json(codec::encode(identifier)?);

        tracing::debug!(id = %identifier, url = %request.url, "GET identifiable");

        let response = self.transport.send(request)?;
        if !response.is_ok() {
            return self.reject(response, failsafe, || {
                format!("fetch Identifiable with id {identifier}")
            });
        }

        Ok(Some(codec::decode(&response.bytes()?)?))
    }

    /// Replace an existing Identifiable on the server.
    ///
    /// Returns the identifier reported back by the server.
    ///
    /// # Errors
    ///
    /// Same contract as [`get_identifiable`](Self::get_identifiable).
    pub fn modify_identifiable<I: Identifiable>(
        &self,
        identifiable: &I,
        failsafe: bool,
    ) -> Result<Option<Identifier>> {
        self.store_identifiable(
            Method::Put,
            endpoints::MODIFY_IDENTIFIABLE,
            identifiable,
            failsafe,
        )
    }

    /// Create a new Identifiable on the server.
    ///
    /// Returns the identifier reported back by the server.
    ///
    /// # Errors
    ///
    /// Same contract as [`get_identifiable`](Self::get_identifiable).
    pub fn add_identifiable<I: Identifiable>(
        &self,
        identifiable: &I,
        failsafe: bool,
    ) -> Result<Option<Identifier>> {
        self.store_identifiable(
            Method::Post,
            endpoints::ADD_IDENTIFIABLE,
            identifiable,
            failsafe,
        )
    }

    /// Find all Identifiables declaring `semantic_id`.
    ///
    /// The order of the results is whatever the server returns. A non-200
    /// status yields an empty list rather than an error: "nothing matched"
    /// and "the server refused" are not told apart here.
    ///
    /// # Errors
    ///
    /// Returns error only on transport failure or an undecodable 200 body.
    pub fn query_semantic_id(
        &self,
        semantic_id: &Key,
        options: MatchOptions,
    ) -> Result<Vec<SemanticQueryResult>> {
        let body = codec::encode(&SemanticQueryRequest::new(semantic_id, options))?;
        let request = self
            .authed_request(Method::Get, endpoints::QUERY_SEMANTIC_ID)
            .json(body);

        tracing::debug!(value = %semantic_id.value, url = %request.url, "GET semantic id query");

        let response = self.transport.send(request)?;
        if !response.is_ok() {
            tracing::warn!(
                value = %semantic_id.value,
                status = response.status,
                "Semantic id query failed, returning no results"
            );
            return Ok(Vec::new());
        }

        Ok(codec::decode(&response.bytes()?)?)
    }

    /// Download the file `file_iri` into `save_as`, replacing any existing file.
    ///
    /// The body is staged in a temporary file next to `save_as`, which is
    /// only replaced once the whole body has been written. Any failure leaves
    /// a previous `save_as` untouched. Returns `file_iri`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Server` on a non-200 status unless `failsafe` is
    /// set. Transport errors and errors writing `save_as` are always returned.
    pub fn get_file(
        &self,
        file_iri: &str,
        save_as: &Path,
        failsafe: bool,
    ) -> Result<Option<String>> {
        let request = self
            .authed_request(Method::Get, endpoints::GET_FILE)
            .json(codec::encode(file_iri)?);

        tracing::debug!(file_iri, save_as = %save_as.display(), "GET file");

        let response = self.transport.send(request)?;
        if !response.is_ok() {
            return self.reject(response, failsafe, || format!("fetch file {file_iri}"));
        }

        let written = stream_to_file(response.into_reader(), save_as)?;
        tracing::debug!(file_iri, bytes = written, "File downloaded");
        Ok(Some(file_iri.to_string()))
    }

    /// Upload the file at `path`.
    ///
    /// The content is streamed in chunks; the `name` header carries the base
    /// name of `path`. Returns the IRI the server assigned.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::LocalValidation` before contacting the server if
    /// `path` is not an existing regular file. Otherwise same contract as
    /// [`get_file`](Self::get_file).
    pub fn add_file(&self, path: &Path, failsafe: bool) -> Result<Option<String>> {
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LocalValidationError::FileNotFound(path.to_path_buf()).into());
            }
            Err(e) => return Err(ClientError::io(path, &e)),
        };
        if !metadata.is_file() {
            return Err(LocalValidationError::NotAFile(path.to_path_buf()).into());
        }
        // a regular file always has a final path component
        let name = upload_name(&path.file_name().unwrap_or_default().to_string_lossy());

        let chunks =
            FileChunks::open(path, self.chunk_size).map_err(|e| ClientError::io(path, &e))?;
        let request = self
            .authed_request(Method::Post, endpoints::POST_FILE)
            .header(FILE_NAME_HEADER, name)
            .stream(chunks);

        tracing::debug!(path = %path.display(), size = metadata.len(), "POST file");

        let response = self.transport.send(request)?;
        if !response.is_ok() {
            return self.reject(response, failsafe, || {
                format!("upload file {}", path.display())
            });
        }

        Ok(Some(response.text()?))
    }

    fn store_identifiable<I: Identifiable>(
        &self,
        method: Method,
        endpoint: &str,
        identifiable: &I,
        failsafe: bool,
    ) -> Result<Option<Identifier>> {
        let identifier = identifiable.identification();
        let request = self
            .authed_request(method, endpoint)
            .json(codec::encode(identifiable)?);

        tracing::debug!(id = %identifier, %method, url = %request.url, "Store identifiable");

        let response = self.transport.send(request)?;
        if !response.is_ok() {
            let action = if method == Method::Put { "modify" } else { "add" };
            return self.reject(response, failsafe, || {
                format!("{action} Identifiable with id {identifier}")
            });
        }

        Ok(Some(codec::decode(&response.bytes()?)?))
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Request carrying its own copy of the session headers.
    fn authed_request(&self, method: Method, endpoint: &str) -> Request {
        Request::new(method, self.url(endpoint)).headers(self.auth_headers())
    }

    fn reject<R>(
        &self,
        response: Response,
        failsafe: bool,
        context: impl FnOnce() -> String,
    ) -> Result<Option<R>> {
        let status = response.status;
        if failsafe {
            tracing::debug!(status, "Request failed, failsafe returns nothing");
            return Ok(None);
        }

        Err(ClientError::Server {
            status,
            context: context(),
            uri: self.base_url.clone(),
            body: response.text().unwrap_or_default(),
        })
    }
}

/// Header-safe upload name: control, `%` and non-ASCII characters are percent-encoded.
fn upload_name(file_name: &str) -> String {
    utf8_percent_encode(file_name, UPLOAD_NAME_ESCAPE).to_string()
}

/// Write `body` to a temporary file beside `path`, then move it into place.
fn stream_to_file(body: impl Read, path: &Path) -> Result<u64> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| ClientError::io(path, &e))?;
    let written = copy_body(body, staged.as_file_mut(), path)?;

    staged
        .persist(path)
        .map_err(|e| ClientError::io(path, &e.error))?;
    Ok(written)
}

fn copy_body(mut body: impl Read, file: &mut fs::File, path: &Path) -> Result<u64> {
    let mut writer = BufWriter::new(file);
    let mut buf = [0u8; 8192];
    let mut written = 0u64;

    loop {
        let n = match body.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(ClientError::Transport(format!(
                    "failed to read response body: {e}"
                )))
            }
        };
        writer
            .write_all(&buf[..n])
            .map_err(|e| ClientError::io(path, &e))?;
        written += n as u64;
    }

    writer.flush().map_err(|e| ClientError::io(path, &e))?;
    Ok(written)
}
