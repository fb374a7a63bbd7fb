//! Reference keys, used as semantic identifiers in queries.

use serde::{Deserialize, Serialize};

/// What kind of element a `Key` points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum KeyElements {
    GlobalReference,
    FragmentReference,
    AccessPermissionRule,
    AnnotatedRelationshipElement,
    Asset,
    AssetAdministrationShell,
    BasicEvent,
    Blob,
    Capability,
    ConceptDescription,
    ConceptDictionary,
    DataElement,
    Entity,
    Event,
    File,
    MultiLanguageProperty,
    Operation,
    Property,
    Range,
    ReferenceElement,
    RelationshipElement,
    Submodel,
    SubmodelElement,
    SubmodelElementCollection,
    View,
}

/// How the `value` of a `Key` is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// Proprietary identifier
    Custom,
    /// International Registration Data Identifier
    #[serde(rename = "IRDI")]
    Irdi,
    /// Internationalized Resource Identifier
    #[serde(rename = "IRI")]
    Iri,
    /// Short id of a referable, unique within its namespace
    IdShort,
    /// Identifier of a fragment within a file
    FragmentId,
}

/// A single key of a reference.
///
/// Used as the semantic identifier when querying the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    /// Element kind the key refers to
    #[serde(rename = "type")]
    pub type_: KeyElements,
    /// Whether the referenced element lives inside the same shell
    pub local: bool,
    /// Key value, interpreted according to `id_type`
    pub value: String,
    /// Interpretation of `value`
    #[serde(rename = "idType")]
    pub id_type: KeyType,
}

impl Key {
    /// Create a new key.
    #[must_use]
    pub fn new(
        type_: KeyElements,
        local: bool,
        value: impl Into<String>,
        id_type: KeyType,
    ) -> Self {
        Self {
            type_,
            local,
            value: value.into(),
            id_type,
        }
    }

    /// Create a non-local global reference key with an IRI value.
    #[must_use]
    pub fn global_iri(value: impl Into<String>) -> Self {
        Self::new(KeyElements::GlobalReference, false, value, KeyType::Iri)
    }
}

/// Both tag enums parse from their wire names.
macro_rules! impl_from_wire_name {
    ($ty:ty) => {
        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                serde_json::from_value(serde_json::Value::String(s.to_string()))
                    .map_err(|_| format!("unknown {}: {s}", stringify!($ty)))
            }
        }
    };
}

impl_from_wire_name!(KeyElements);
impl_from_wire_name!(KeyType);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format() {
        let key = Key::new(
            KeyElements::ConceptDescription,
            true,
            "BASY-1#02-LPipe1#001",
            KeyType::Irdi,
        );
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "ConceptDescription",
                "local": true,
                "value": "BASY-1#02-LPipe1#001",
                "idType": "IRDI"
            })
        );
    }

    #[test]
    fn global_iri_defaults() {
        let key = Key::global_iri("https://example.com/semanticIDs/TWO");
        assert_eq!(key.type_, KeyElements::GlobalReference);
        assert!(!key.local);
        assert_eq!(key.id_type, KeyType::Iri);
    }

    #[test]
    fn parse_wire_names() {
        assert_eq!(
            "AssetAdministrationShell".parse::<KeyElements>(),
            Ok(KeyElements::AssetAdministrationShell)
        );
        assert_eq!("IRI".parse::<KeyType>(), Ok(KeyType::Iri));
        assert_eq!("IdShort".parse::<KeyType>(), Ok(KeyType::IdShort));
        assert!("Nope".parse::<KeyElements>().is_err());
    }
}
