//! Extraction result types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::GtsId;

/// Primary identity of a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResult {
    /// Entity or schema identifier; empty when none was found.
    pub id: String,

    /// Schema/type identifier, if one was found or derived.
    pub schema_id: Option<String>,

    /// Property the entity identifier was read from.
    pub selected_entity_field: Option<String>,

    /// Property the schema identifier was read or derived from.
    pub selected_schema_id_field: Option<String>,

    /// True if the document carries `$schema` or `$$schema`.
    pub is_schema: bool,
}

/// A GTS identifier found somewhere in a JSON tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtsReference {
    /// The identifier string.
    pub id: String,

    /// Where it was found, e.g. `$id`, `properties.x.$ref`, `items[0]`;
    /// `root` when the tree itself is the string.
    pub source_path: String,
}

impl GtsReference {
    pub fn new(id: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_path: source_path.into(),
        }
    }
}

/// A JSON document together with its resolved identity and every GTS reference in it.
///
/// Borrows the document; nothing here mutates it.
#[derive(Debug, Clone)]
pub struct GtsJsonEntity<'a> {
    /// Parsed identifier; `None` for anonymous instances.
    pub gts_id: Option<GtsId>,

    /// Schema/type identifier, derived from the entity chain or read from a field.
    pub schema_id: String,

    pub selected_entity_field: Option<String>,

    pub selected_schema_id_field: Option<String>,

    pub is_schema: bool,

    /// The source document.
    pub content: &'a Map<String, Value>,

    /// References in traversal order.
    pub references: Vec<GtsReference>,

    /// Display label: the identifier string, or empty.
    pub label: String,
}
