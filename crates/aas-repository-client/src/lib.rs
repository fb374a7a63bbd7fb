//! # AAS Repository Client
//!
//! Blocking client for an AAS repository server: log in, fetch, create and
//! update Identifiables, query by semantic id, and transfer files.
//!
//! ```no_run
//! use aas_repository_client::{ClientConfig, MatchOptions, RepositoryClient};
//! use aas_repository_model::{Identifier, IdentifiableObject, Key};
//!
//! # fn main() -> Result<(), aas_repository_client::ClientError> {
//! let mut client = RepositoryClient::new(&ClientConfig::new("http://127.0.0.1:2234", "test"))?;
//! client.login("test")?;
//!
//! let shell: Option<IdentifiableObject> =
//!     client.get_identifiable(&Identifier::iri("https://FLUIDON.com/AAS_Ram_Z1"), true)?;
//!
//! let matches = client.query_semantic_id(
//!     &Key::global_iri("https://example.com/semanticIDs/TWO"),
//!     MatchOptions::default(),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Endpoints
//!
//! | Operation | Verb | Path |
//! |---|---|---|
//! | login | GET | `/login` |
//! | get identifiable | GET | `/get_identifiable` |
//! | modify identifiable | PUT | `/modify_identifiable` |
//! | add identifiable | POST | `/add_identifiable` |
//! | semantic id query | GET | `/query_semantic_id` |
//! | download file | GET | `/get_fmu` |
//! | upload file | POST | `/post_file` |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chunks;
pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod transport;

pub use client::{endpoints, RepositoryClient, AUTH_TOKEN_HEADER, FILE_NAME_HEADER};
pub use config::ClientConfig;
pub use error::{ClientError, LocalValidationError, LoginError, Result};
pub use query::{MatchOptions, SemanticQueryResult};
pub use transport::{Headers, HttpTransport, Method, Request, RequestBody, Response, Transport};
