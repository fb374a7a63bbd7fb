//! Semantic id queries.

use aas_repository_model::{Identifier, Key};
use serde::{Deserialize, Serialize};

/// Which key attributes besides the value must match in a semantic query.
///
/// All flags default to `false`, i.e. only the key value is compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Also require the key element type to match
    pub check_key_type: bool,
    /// Also require the locality flag to match
    pub check_key_local: bool,
    /// Also require the key id type to match
    pub check_key_id_type: bool,
}

impl MatchOptions {
    /// Compare every attribute of the key.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            check_key_type: true,
            check_key_local: true,
            check_key_id_type: true,
        }
    }
}

/// Body of a `/query_semantic_id` request.
#[derive(Debug, Serialize)]
pub(crate) struct SemanticQueryRequest<'a> {
    pub semantic_id: &'a Key,
    pub check_for_key_type: bool,
    pub check_for_key_local: bool,
    pub check_for_key_id_type: bool,
}

impl<'a> SemanticQueryRequest<'a> {
    pub fn new(semantic_id: &'a Key, options: MatchOptions) -> Self {
        Self {
            semantic_id,
            check_for_key_type: options.check_key_type,
            check_for_key_local: options.check_key_local,
            check_for_key_id_type: options.check_key_id_type,
        }
    }
}

/// One match of a semantic query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SemanticQueryResult {
    /// Identifiable that declares (or contains an element declaring) the semantic id
    pub identifier: Identifier,
    /// Shell containing that Identifiable, if there is one
    #[serde(default)]
    pub asset_administration_shell: Option<Identifier>,
}
