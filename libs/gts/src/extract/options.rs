//! Extraction configuration.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Properties checked for the entity identifier, in priority order.
pub const DEFAULT_ENTITY_ID_PROPERTY_NAMES: &[&str] = &[
    "$id", "gtsId", "gtsIid", "gtsOid", "gtsI", "gts_id", "gts_oid", "gts_iid", "id",
];

/// Properties checked for the schema/type identifier, in priority order.
pub const DEFAULT_SCHEMA_ID_PROPERTY_NAMES: &[&str] = &[
    "gtsTid", "gtsType", "gtsT", "gts_t", "gts_tid", "gts_type", "type", "schema",
];

static DEFAULT_OPTIONS: LazyLock<ExtractOptions> = LazyLock::new(ExtractOptions::default);

/// Which JSON properties hold the entity and schema identifiers.
///
/// Either list can be overridden on its own; a missing list in a serialized
/// form falls back to the default.
///
/// ```
/// use gts_id::ExtractOptions;
///
/// let options: ExtractOptions =
///     serde_json::from_str(r#"{"entityIdPropertyNames": ["custom_id"]}"#).unwrap();
/// assert_eq!(options.entity_id_property_names, vec!["custom_id"]);
/// assert_eq!(options.schema_id_property_names.len(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractOptions {
    /// Entity identifier property names, highest priority first.
    pub entity_id_property_names: Vec<String>,

    /// Schema identifier property names, highest priority first.
    pub schema_id_property_names: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            entity_id_property_names: to_owned_names(DEFAULT_ENTITY_ID_PROPERTY_NAMES),
            schema_id_property_names: to_owned_names(DEFAULT_SCHEMA_ID_PROPERTY_NAMES),
        }
    }
}

impl ExtractOptions {
    /// Creates options with the default property lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entity identifier property list.
    #[must_use]
    pub fn with_entity_id_property_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entity_id_property_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the schema identifier property list.
    #[must_use]
    pub fn with_schema_id_property_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schema_id_property_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Shared, read-only default options.
    pub(crate) fn shared_default() -> &'static ExtractOptions {
        &DEFAULT_OPTIONS
    }
}

fn to_owned_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
