//! Identifiable objects.
//!
//! The repository client never interprets an Identifiable beyond its
//! identification; everything else travels through untouched.

use crate::identifier::Identifier;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An object the repository server manages under a globally unique identifier.
pub trait Identifiable: Serialize + DeserializeOwned {
    /// Identifier of this object.
    fn identification(&self) -> &Identifier;
}

/// Model type tag, e.g. `{"name": "Submodel"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelType {
    /// Name of the concrete metamodel class
    pub name: String,
}

/// Opaque Identifiable (shell, submodel, asset, concept description, ...).
///
/// Attributes other than the identification, idShort and model type are kept
/// verbatim in `attributes` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiableObject {
    /// Unique identifier
    pub identification: Identifier,
    /// Short name, unique within the parent namespace
    #[serde(rename = "idShort", default, skip_serializing_if = "Option::is_none")]
    pub id_short: Option<String>,
    /// Metamodel class of this object
    #[serde(rename = "modelType")]
    pub model_type: ModelType,
    /// All remaining attributes
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl IdentifiableObject {
    /// Create an object of the given model type with no further attributes.
    #[must_use]
    pub fn new(model_type: impl Into<String>, identification: Identifier) -> Self {
        Self {
            identification,
            id_short: None,
            model_type: ModelType {
                name: model_type.into(),
            },
            attributes: Map::new(),
        }
    }

    /// Create an empty submodel.
    #[must_use]
    pub fn submodel(identification: Identifier) -> Self {
        Self::new("Submodel", identification)
    }

    /// Create an empty asset administration shell.
    #[must_use]
    pub fn shell(identification: Identifier) -> Self {
        Self::new("AssetAdministrationShell", identification)
    }

    /// Set the idShort.
    #[must_use]
    pub fn with_id_short(mut self, id_short: impl Into<String>) -> Self {
        self.id_short = Some(id_short.into());
        self
    }
}

impl Identifiable for IdentifiableObject {
    fn identification(&self) -> &Identifier {
        &self.identification
    }
}
