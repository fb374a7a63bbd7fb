//! # AAS Repository Model
//!
//! Domain types exchanged with an AAS repository server, and the JSON codec
//! used to put them on the wire.
//!
//! This crate provides:
//! - `Identifier` / `IdentifierType` naming an Identifiable
//! - `Key` with its `KeyElements` and `KeyType` tags, used for semantic queries
//! - The `Identifiable` trait and an opaque `IdentifiableObject` payload
//! - `encode` / `decode` helpers with a typed `CodecError`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod identifiable;
pub mod identifier;
pub mod key;

pub use codec::{decode, encode, CodecError};
pub use identifiable::{Identifiable, IdentifiableObject, ModelType};
pub use identifier::{Identifier, IdentifierType};
pub use key::{Key, KeyElements, KeyType};
