//! Locating GTS identifiers in JSON documents.
//!
//! A document's own identifier is read from the first configured entity
//! property holding a valid identifier or pattern, falling back to the first
//! non-empty one. Its schema identifier is derived from the entity chain when
//! possible, otherwise read from `$schema` (schemas) or the configured schema
//! properties (instances). Malformed values never fail extraction; they only
//! leave result fields empty.

mod entity;
mod options;

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::GtsError;
use crate::id::GtsId;

pub use entity::{ExtractResult, GtsJsonEntity, GtsReference};
pub use options::{
    ExtractOptions, DEFAULT_ENTITY_ID_PROPERTY_NAMES, DEFAULT_SCHEMA_ID_PROPERTY_NAMES,
};

const GTS_URI_PREFIX: &str = "gts://";
const ID_PROPERTY: &str = "$id";
const SCHEMA_PROPERTY: &str = "$schema";
const ALT_SCHEMA_PROPERTY: &str = "$$schema";
const ROOT_PATH: &str = "root";

/// Returns true if `s` is a valid type, instance, or pattern string.
pub fn is_valid_gts_id(s: &str) -> bool {
    GtsId::is_valid(s)
}

/// Extracts the primary entity and schema identifiers from a JSON object.
pub fn extract_id(json: &Map<String, Value>, options: Option<&ExtractOptions>) -> ExtractResult {
    let options = options.unwrap_or_else(|| ExtractOptions::shared_default());
    let identity = resolve_identity(json, options);

    let id = match (&identity.gts_id, identity.is_schema) {
        (Some(gts_id), _) => gts_id.as_str().to_string(),
        (None, true) => String::new(),
        // Anonymous instance: report whatever the winning field held.
        (None, false) => identity.entity_value.unwrap_or_default().to_string(),
    };

    ExtractResult {
        id,
        schema_id: (!identity.schema_id.is_empty()).then(|| identity.schema_id.to_string()),
        selected_entity_field: identity.entity_field.map(str::to_string),
        selected_schema_id_field: identity.schema_field.map(str::to_string),
        is_schema: identity.is_schema,
    }
}

/// Like [`extract_id`], for any JSON value. A non-object yields an empty result.
pub fn extract_id_from_value(json: &Value, options: Option<&ExtractOptions>) -> ExtractResult {
    match json {
        Value::Object(map) => extract_id(map, options),
        _ => ExtractResult::default(),
    }
}

/// Like [`extract_id`], decoding the document from JSON text first.
///
/// Unlike [`extract_id_from_value`], a root that is not an object is an error.
pub fn extract_id_from_str(
    text: &str,
    options: Option<&ExtractOptions>,
) -> Result<ExtractResult, GtsError> {
    let json: Value = serde_json::from_str(text)?;
    match &json {
        Value::Object(map) => Ok(extract_id(map, options)),
        other => Err(GtsError::NotAnObject {
            kind: json_kind(other),
        }),
    }
}

/// Resolves the document's identity and collects every GTS reference in it.
pub fn extract_entity<'a>(
    json: &'a Map<String, Value>,
    options: Option<&ExtractOptions>,
) -> GtsJsonEntity<'a> {
    let options = options.unwrap_or_else(|| ExtractOptions::shared_default());
    let identity = resolve_identity(json, options);

    let mut references = Vec::new();
    let mut seen = HashSet::new();
    for (key, value) in json {
        collect_references(value, key.clone(), &mut references, &mut seen);
    }
    debug!(count = references.len(), "collected GTS references");

    let label = identity
        .gts_id
        .as_ref()
        .map(|id| id.as_str().to_string())
        .unwrap_or_default();

    GtsJsonEntity {
        gts_id: identity.gts_id,
        schema_id: identity.schema_id.to_string(),
        selected_entity_field: identity.entity_field.map(str::to_string),
        selected_schema_id_field: identity.schema_field.map(str::to_string),
        is_schema: identity.is_schema,
        content: json,
        references,
        label,
    }
}

/// Walks the tree depth-first and returns every string leaf that is a valid
/// GTS identifier or pattern, with its path. Duplicate `(id, path)` pairs
/// are reported once, at their first occurrence.
pub fn extract_references(json: &Value) -> Vec<GtsReference> {
    let mut references = Vec::new();
    let mut seen = HashSet::new();
    collect_references(json, String::new(), &mut references, &mut seen);
    references
}

// =============================================================================
// Identity resolution
// =============================================================================

struct Identity<'o, 'j> {
    is_schema: bool,
    entity_field: Option<&'o str>,
    entity_value: Option<&'j str>,
    gts_id: Option<GtsId>,
    schema_id: &'j str,
    schema_field: Option<&'o str>,
}

fn resolve_identity<'o, 'j>(
    json: &'j Map<String, Value>,
    options: &'o ExtractOptions,
) -> Identity<'o, 'j> {
    let is_schema = json.contains_key(SCHEMA_PROPERTY) || json.contains_key(ALT_SCHEMA_PROPERTY);

    let (entity_field, entity_value) =
        match first_non_empty_field(json, &options.entity_id_property_names) {
            Some((field, value)) => (Some(field), Some(value)),
            None => (None, None),
        };
    let valid_value = entity_value.filter(|v| is_valid_gts_id(v));

    let (schema_id, schema_field) = if is_schema {
        if let Some(prefix) = valid_value.and_then(schema_chain_prefix) {
            debug!(
                field = %entity_field.unwrap_or_default(),
                schema_id = %prefix,
                "schema id derived from schema chain"
            );
            (prefix, entity_field)
        } else if let Some(value) = field_value(json, SCHEMA_PROPERTY) {
            (value, Some(SCHEMA_PROPERTY))
        } else {
            ("", None)
        }
    } else if let Some(prefix) = valid_value.and_then(instance_chain_prefix) {
        debug!(
            field = %entity_field.unwrap_or_default(),
            schema_id = %prefix,
            "schema id derived from instance chain"
        );
        (prefix, entity_field)
    } else {
        match first_non_empty_field(json, &options.schema_id_property_names) {
            Some((field, value)) => (value, Some(field)),
            None => ("", None),
        }
    };

    let gts_id = valid_value.and_then(GtsId::try_parse);

    debug!(
        is_schema,
        entity_field = %entity_field.unwrap_or_default(),
        schema_field = %schema_field.unwrap_or_default(),
        parsed = gts_id.is_some(),
        "resolved document identity"
    );

    Identity {
        is_schema,
        entity_field,
        entity_value,
        gts_id,
        schema_id,
        schema_field,
    }
}

/// For a type chain with two or more `~`, the prefix through the first `~`.
fn schema_chain_prefix(value: &str) -> Option<&str> {
    if !value.ends_with('~') {
        return None;
    }
    let first = value.find('~')?;
    value[first + 1..]
        .contains('~')
        .then(|| &value[..=first])
}

/// For an instance chain, the prefix through the last `~`.
fn instance_chain_prefix(value: &str) -> Option<&str> {
    if value.ends_with('~') {
        return None;
    }
    let last = value.rfind('~')?;
    (last > 0).then(|| &value[..=last])
}

/// Trimmed string value of a property; `gts://` is stripped from `$id`.
fn field_value<'j>(json: &'j Map<String, Value>, name: &str) -> Option<&'j str> {
    let mut value = json.get(name)?.as_str()?.trim();
    if name == ID_PROPERTY {
        value = value.strip_prefix(GTS_URI_PREFIX).unwrap_or(value);
    }
    (!value.is_empty()).then_some(value)
}

/// Selects the property an identifier is read from.
///
/// The first pass takes the earliest valid identifier in document order among
/// the configured names. The second pass falls back to the first non-empty
/// value in list order.
fn first_non_empty_field<'o, 'j>(
    json: &'j Map<String, Value>,
    names: &'o [String],
) -> Option<(&'o str, &'j str)> {
    let valid = json.keys().find_map(|key| {
        let name = names.iter().find(|name| *name == key)?;
        field_value(json, name)
            .filter(|value| is_valid_gts_id(value))
            .map(|value| (name.as_str(), value))
    });

    valid.or_else(|| {
        names
            .iter()
            .find_map(|name| field_value(json, name).map(|value| (name.as_str(), value)))
    })
}

// =============================================================================
// Reference walk
// =============================================================================

fn collect_references(
    node: &Value,
    path: String,
    references: &mut Vec<GtsReference>,
    seen: &mut HashSet<GtsReference>,
) {
    match node {
        Value::String(s) => {
            let value = s.trim();
            if value.is_empty() || !is_valid_gts_id(value) {
                return;
            }
            let source_path = if path.is_empty() {
                ROOT_PATH.to_string()
            } else {
                path
            };
            let reference = GtsReference::new(value, source_path);
            if seen.insert(reference.clone()) {
                references.push(reference);
            }
        }
        Value::Object(map) => {
            for (key, value) in map {
                let next = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                collect_references(value, next, references, seen);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                collect_references(value, format!("{path}[{index}]"), references, seen);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_field_value_trims_and_strips_uri_prefix() {
        let doc = object(json!({
            "$id": "  gts://gts.a.b.c.d.v1~ ",
            "id": "gts://gts.a.b.c.d.v1~",
            "blank": "   ",
            "number": 7,
        }));
        assert_eq!(field_value(&doc, "$id"), Some("gts.a.b.c.d.v1~"));
        assert_eq!(field_value(&doc, "id"), Some("gts://gts.a.b.c.d.v1~"));
        assert_eq!(field_value(&doc, "blank"), None);
        assert_eq!(field_value(&doc, "number"), None);
        assert_eq!(field_value(&doc, "missing"), None);
    }

    #[test]
    fn test_whitespace_after_uri_prefix_is_kept() {
        let doc = object(json!({ "$id": "gts://  gts.a.b.c.d.v1~" }));
        assert_eq!(field_value(&doc, "$id"), Some("  gts.a.b.c.d.v1~"));
    }

    #[test]
    fn test_bare_uri_prefix_is_empty() {
        let doc = object(json!({ "$id": "gts://" }));
        assert_eq!(field_value(&doc, "$id"), None);
    }

    #[test]
    fn test_first_non_empty_field_prefers_valid() {
        let names: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        let doc = object(json!({ "a": "junk", "b": "gts.a.b.c.d.v1", "c": "gts.x.*" }));
        assert_eq!(
            first_non_empty_field(&doc, &names),
            Some(("b", "gts.a.b.c.d.v1"))
        );

        let doc = object(json!({ "b": "junk", "c": "more junk" }));
        assert_eq!(first_non_empty_field(&doc, &names), Some(("b", "junk")));

        let doc = object(json!({ "z": "gts.a.b.c.d.v1" }));
        assert_eq!(first_non_empty_field(&doc, &names), None);
    }

    #[test]
    fn test_first_valid_field_follows_document_order() {
        let names: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        let doc = object(json!({ "c": "gts.x.*", "b": "junk", "a": "gts.a.b.c.d.v1" }));
        assert_eq!(first_non_empty_field(&doc, &names), Some(("c", "gts.x.*")));

        // The fallback for invalid values keeps list order.
        let doc = object(json!({ "c": "more junk", "b": "junk" }));
        assert_eq!(first_non_empty_field(&doc, &names), Some(("b", "junk")));
    }

    #[test]
    fn test_chain_prefixes() {
        assert_eq!(
            schema_chain_prefix("gts.a.b.c.d.v1~e.f.g.h.v1~"),
            Some("gts.a.b.c.d.v1~")
        );
        assert_eq!(schema_chain_prefix("gts.a.b.c.d.v1~"), None);
        assert_eq!(schema_chain_prefix("gts.a.b.c.d.v1~e.f.g.h.v1"), None);

        assert_eq!(
            instance_chain_prefix("gts.a.b.c.d.v1~e.f.g.h.v1~i.j.k.l.v1"),
            Some("gts.a.b.c.d.v1~e.f.g.h.v1~")
        );
        assert_eq!(instance_chain_prefix("gts.a.b.c.d.v1"), None);
        assert_eq!(instance_chain_prefix("gts.a.b.c.d.v1~"), None);
    }

    #[test]
    fn test_reference_paths() {
        let refs = extract_references(&json!({
            "$id": "gts.a.b.c.d.v1~",
            "items": [{ "$ref": "gts.a.b.c.e.v1~" }, "gts.a.b.c.f.v1~"],
            "nested": { "deep": { "x": " gts.a.b.c.g.v1 " } },
            "count": 3,
            "plain": "hello",
        }));

        assert_eq!(
            refs,
            vec![
                GtsReference::new("gts.a.b.c.d.v1~", "$id"),
                GtsReference::new("gts.a.b.c.e.v1~", "items[0].$ref"),
                GtsReference::new("gts.a.b.c.f.v1~", "items[1]"),
                GtsReference::new("gts.a.b.c.g.v1", "nested.deep.x"),
            ]
        );
    }

    #[test]
    fn test_reference_root_paths() {
        assert_eq!(
            extract_references(&json!("gts.a.b.c.d.v1~")),
            vec![GtsReference::new("gts.a.b.c.d.v1~", "root")]
        );
        assert_eq!(
            extract_references(&json!(["gts.a.*"])),
            vec![GtsReference::new("gts.a.*", "[0]")]
        );
        assert!(extract_references(&Value::Null).is_empty());
    }

    #[test]
    fn test_reference_duplicates_suppressed() {
        // A dotted key and a nested object produce the same path.
        let refs = extract_references(&json!({
            "a.b": "gts.a.b.c.d.v1~",
            "a": { "b": "gts.a.b.c.d.v1~" },
        }));
        assert_eq!(refs, vec![GtsReference::new("gts.a.b.c.d.v1~", "a.b")]);
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&json!([])), "array");
        assert_eq!(json_kind(&json!("s")), "string");
        assert_eq!(json_kind(&Value::Null), "null");
    }
}
