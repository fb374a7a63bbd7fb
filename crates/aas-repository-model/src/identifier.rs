//! Identifiers of Identifiables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an identifier string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierType {
    /// International Registration Data Identifier (ISO 29002-5)
    #[serde(rename = "IRDI")]
    Irdi,
    /// Internationalized Resource Identifier
    #[serde(rename = "IRI")]
    Iri,
    /// Any other, proprietary identifier
    Custom,
}

impl IdentifierType {
    /// Wire name of this identifier type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Irdi => "IRDI",
            Self::Iri => "IRI",
            Self::Custom => "Custom",
        }
    }
}

impl std::str::FromStr for IdentifierType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IRDI" => Ok(Self::Irdi),
            "IRI" => Ok(Self::Iri),
            "Custom" => Ok(Self::Custom),
            other => Err(format!("unknown identifier type: {other}")),
        }
    }
}

/// Globally unique name of an Identifiable.
///
/// Two identifiers are equal only if both the id string and the id type match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    /// The identifier string
    pub id: String,
    /// How `id` is to be interpreted
    #[serde(rename = "idType")]
    pub id_type: IdentifierType,
}

impl Identifier {
    /// Create a new identifier.
    #[must_use]
    pub fn new(id: impl Into<String>, id_type: IdentifierType) -> Self {
        Self {
            id: id.into(),
            id_type,
        }
    }

    /// Create an IRI identifier.
    #[must_use]
    pub fn iri(id: impl Into<String>) -> Self {
        Self::new(id, IdentifierType::Iri)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
