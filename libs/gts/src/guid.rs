//! Deterministic name-based UUIDs (RFC 4122 version 5).
//!
//! Every GTS identifier maps to a stable 128-bit handle:
//! `uuid5(GTS_NAMESPACE, canonical_id)`, where
//! `GTS_NAMESPACE = uuid5(NAMESPACE_URL, "gts")`.
//!
//! [`Uuid`] keeps its bytes in RFC (big-endian) order, which is exactly the
//! layout hashed by the algorithm. Some platforms store GUIDs with the first
//! three fields little-endian; [`to_guid_bytes_le`] and [`from_guid_bytes_le`]
//! convert to and from that layout without changing the value.

use std::sync::LazyLock;

use uuid::Uuid;

use crate::error::GtsError;

/// Name hashed under the URL namespace to produce [`GTS_NAMESPACE`].
pub const GTS_NAMESPACE_NAME: &str = "gts";

/// The GTS namespace: `uuid5(NAMESPACE_URL, "gts")`.
///
/// Must equal `63b06280-5dd6-517d-abc6-5a2127e843c3` on every implementation.
pub static GTS_NAMESPACE: LazyLock<Uuid> =
    LazyLock::new(|| derive(&Uuid::NAMESPACE_URL, GTS_NAMESPACE_NAME));

/// Creates a version 5 UUID from a namespace and the UTF-8 bytes of `name`.
pub fn create(namespace: &Uuid, name: &str) -> Result<Uuid, GtsError> {
    if name.is_empty() {
        return Err(GtsError::EmptyName);
    }
    Ok(derive(namespace, name))
}

/// Creates a version 5 UUID in the GTS namespace.
pub fn create_gts(name: &str) -> Result<Uuid, GtsError> {
    create(&GTS_NAMESPACE, name)
}

/// Parsed identifiers are never empty, so callers holding one skip the name check.
pub(crate) fn derive(namespace: &Uuid, name: &str) -> Uuid {
    Uuid::new_v5(namespace, name.as_bytes())
}

/// Returns the bytes of `uuid` in little-endian GUID layout.
pub fn to_guid_bytes_le(uuid: &Uuid) -> [u8; 16] {
    uuid.to_bytes_le()
}

/// Reads a UUID from little-endian GUID layout.
pub fn from_guid_bytes_le(bytes: [u8; 16]) -> Uuid {
    Uuid::from_bytes_le(bytes)
}
