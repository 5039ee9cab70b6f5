//! The validated identifier type and pattern matching.

use std::fmt;
use std::hash::{Hash, Hasher};

use uuid::Uuid;

use crate::error::GtsError;
use crate::guid;
use crate::parser::{self, ParsedId, ParsedKind};
use crate::segment::GtsIdSegment;

/// Which grammar accepted an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GtsIdKind {
    /// Every segment is terminated by `~`.
    Type,
    /// Segments are separated by `~`, the last one is not terminated.
    Instance,
    /// Segments may be partial and the last may end in `*`.
    Pattern,
}

impl From<ParsedKind> for GtsIdKind {
    fn from(kind: ParsedKind) -> Self {
        match kind {
            ParsedKind::Type => GtsIdKind::Type,
            ParsedKind::Instance => GtsIdKind::Instance,
            ParsedKind::Pattern => GtsIdKind::Pattern,
        }
    }
}

/// A validated GTS identifier.
///
/// The canonical string is the exact text the identifier was parsed from and
/// is the sole key for equality, ordering, and hashing.
///
/// # Example
///
/// ```
/// use gts_id::GtsId;
///
/// let id = GtsId::parse("gts.x.core.events.event.v1~x.app.orders.created.v1.2")?;
/// assert!(id.is_instance());
/// assert!(id.matches_str("gts.x.core.events.event.v1~x.app.*"));
/// # Ok::<(), gts_id::GtsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct GtsId {
    id: String,
    kind: GtsIdKind,
    segments: Vec<GtsIdSegment>,
}

impl GtsId {
    /// Maximum length of an identifier, in characters.
    pub const MAX_LENGTH: usize = parser::MAX_LENGTH;

    /// Parses a type or instance identifier.
    ///
    /// Input ending in `~` is parsed as a type, anything else as an instance.
    pub fn parse(s: &str) -> Result<Self, GtsError> {
        if s.ends_with('~') {
            Self::parse_type(s)
        } else {
            Self::parse_instance(s)
        }
    }

    /// Parses a type identifier (`gts.` followed by `~`-terminated segments).
    pub fn parse_type(s: &str) -> Result<Self, GtsError> {
        parser::parse_type_id(s).map(|parsed| Self::from_parsed(s, &parsed))
    }

    /// Parses an instance identifier (`gts.` followed by `~`-separated segments).
    pub fn parse_instance(s: &str) -> Result<Self, GtsError> {
        parser::parse_instance_id(s).map(|parsed| Self::from_parsed(s, &parsed))
    }

    /// Parses a pattern. Validity is independent of the type/instance grammar.
    pub fn parse_pattern(s: &str) -> Result<Self, GtsError> {
        parser::parse_pattern(s).map(|parsed| Self::from_parsed(s, &parsed))
    }

    /// Parses a type or instance identifier, falling back to a pattern.
    pub fn parse_id_or_pattern(s: &str) -> Result<Self, GtsError> {
        Self::parse(s).or_else(|err| Self::parse_pattern(s).map_err(|_| err))
    }

    /// Non-failing form of [`GtsId::parse`].
    pub fn try_parse(s: &str) -> Option<Self> {
        Self::parse(s).ok()
    }

    /// Non-failing form of [`GtsId::parse_type`].
    pub fn try_parse_type(s: &str) -> Option<Self> {
        Self::parse_type(s).ok()
    }

    /// Non-failing form of [`GtsId::parse_instance`].
    pub fn try_parse_instance(s: &str) -> Option<Self> {
        Self::parse_instance(s).ok()
    }

    /// Non-failing form of [`GtsId::parse_pattern`].
    pub fn try_parse_pattern(s: &str) -> Option<Self> {
        Self::parse_pattern(s).ok()
    }

    /// Returns true if `s` is a valid type, instance, or pattern string.
    pub fn is_valid(s: &str) -> bool {
        Self::parse_id_or_pattern(s).is_ok()
    }

    fn from_parsed(s: &str, parsed: &ParsedId<'_>) -> Self {
        Self {
            id: s.to_string(),
            kind: parsed.kind.into(),
            segments: parsed.segments.iter().map(GtsIdSegment::from).collect(),
        }
    }

    /// The canonical identifier string.
    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> GtsIdKind {
        self.kind
    }

    pub fn is_type(&self) -> bool {
        self.kind == GtsIdKind::Type
    }

    pub fn is_instance(&self) -> bool {
        self.kind == GtsIdKind::Instance
    }

    pub fn is_pattern(&self) -> bool {
        self.kind == GtsIdKind::Pattern
    }

    /// Parsed segments in chain order. Never empty.
    pub fn segments(&self) -> &[GtsIdSegment] {
        &self.segments
    }

    /// Returns true if this identifier matches `pattern`.
    ///
    /// When the pattern text contains `*` it must contain exactly one, as its
    /// last character; otherwise nothing matches. The check looks at the
    /// pattern's canonical string only. Segments are then compared left to
    /// right: closed segments field by field, and the first open segment
    /// accepts the rest of the candidate once its set fields agree. Without
    /// an open segment the pattern must have as many segments as `self`.
    pub fn matches(&self, pattern: &GtsId) -> bool {
        if pattern.id.contains('*') {
            let stars = pattern.id.bytes().filter(|&b| b == b'*').count();
            if stars > 1 || !pattern.id.ends_with('*') {
                return false;
            }
        }

        match_segments(&pattern.segments, &self.segments)
    }

    /// Returns true if this identifier matches the pattern string.
    ///
    /// An empty or unparsable pattern matches nothing.
    pub fn matches_str(&self, pattern: &str) -> bool {
        match GtsId::try_parse_pattern(pattern) {
            Some(pattern) => self.matches(&pattern),
            None => false,
        }
    }

    /// Deterministic UUIDv5 of the canonical string in the GTS namespace.
    pub fn to_guid(&self) -> Uuid {
        guid::derive(&guid::GTS_NAMESPACE, &self.id)
    }
}

/// Segment-wise comparison of a parsed pattern against a candidate.
fn match_segments(pattern: &[GtsIdSegment], candidate: &[GtsIdSegment]) -> bool {
    if pattern.len() > candidate.len() {
        return false;
    }

    for (p, c) in pattern.iter().zip(candidate) {
        if p.is_wildcard() {
            return p.matches_open(c);
        }
        if !p.matches_exact(c) {
            return false;
        }
    }

    pattern.len() == candidate.len()
}

impl PartialEq for GtsId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GtsId {}

impl Hash for GtsId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for GtsId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GtsId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for GtsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl std::str::FromStr for GtsId {
    type Err = GtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for GtsId {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

impl serde::Serialize for GtsId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.id)
    }
}

impl<'de> serde::Deserialize<'de> for GtsId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_id_or_pattern(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> GtsId {
        GtsId::parse(s).unwrap()
    }

    #[test]
    fn test_single_segment_type() {
        let id = id("gts.vendor.package.namespace.type.v1.0~");
        assert!(id.is_type());
        assert!(!id.is_instance());
        assert!(!id.is_pattern());
        assert_eq!(id.segments().len(), 1);
    }

    #[test]
    fn test_multi_segment_type_and_instance() {
        let ty = id("gts.vendor.package.namespace.type.v1.0~vendor2.package2.namespace2.type2.v1.0~");
        assert!(ty.is_type());
        assert_eq!(ty.segments().len(), 2);

        let inst = id("gts.vendor.package.namespace.type.v1.0~vendor2.package2.namespace2.type2.v1.0");
        assert!(inst.is_instance());
        assert_eq!(inst.segments().len(), 2);
    }

    #[test]
    fn test_dispatch_on_trailing_tilde() {
        assert_eq!(id("gts.a.b.c.d.v1~").kind(), GtsIdKind::Type);
        assert_eq!(id("gts.a.b.c.d.v1~e.f.g.h.v1").kind(), GtsIdKind::Instance);
        assert!(GtsId::parse_type("gts.a.b.c.d.v1").is_err());
        assert!(GtsId::parse_instance("gts.a.b.c.d.v1~").is_err());
    }

    #[test]
    fn test_pattern_parsing() {
        let p = GtsId::parse_pattern("gts.vendor.package.namespace.type.*").unwrap();
        assert!(p.is_pattern());
        assert!(!p.is_type());
        assert!(!p.is_instance());
        assert_eq!(p.segments().len(), 1);
        assert!(p.segments()[0].is_wildcard());

        assert!(GtsId::parse("gts.vendor.*").is_err());
    }

    #[test]
    fn test_display_returns_original_text() {
        let s = "gts.vendor.package.namespace.type.v1.0~";
        assert_eq!(id(s).to_string(), s);
        assert_eq!(id(s).as_str(), s);

        let p = "gts.vendor.package.namespace.type.*";
        assert_eq!(GtsId::parse_pattern(p).unwrap().to_string(), p);
    }

    #[test]
    fn test_try_variants() {
        assert!(GtsId::try_parse("gts.a.b.c.d.v1").is_some());
        assert!(GtsId::try_parse("not-an-id").is_none());
        assert!(GtsId::try_parse_pattern("gts.a.*").is_some());
        assert!(GtsId::try_parse_type("gts.a.b.c.d.v1").is_none());
        assert!(GtsId::try_parse_instance("gts.a.b.c.d.v1").is_some());
    }

    #[test]
    fn test_is_valid_accepts_ids_and_patterns() {
        assert!(GtsId::is_valid("gts.a.b.c.d.v1~"));
        assert!(GtsId::is_valid("gts.a.b.c.d.v1"));
        assert!(GtsId::is_valid("gts.a.*"));
        assert!(!GtsId::is_valid("a.b.c.d.v1"));
        assert!(!GtsId::is_valid(""));
    }

    #[test]
    fn test_equality_uses_canonical_string() {
        let a = id("gts.a.b.c.d.v1~");
        let b = id("gts.a.b.c.d.v1~");
        assert_eq!(a, b);
        assert_ne!(a, id("gts.a.b.c.d.v1.0~"));

        let set: std::collections::HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_to_guid_uses_gts_namespace() {
        let id = id("gts.vendor.package.namespace.type.v1.0~");
        assert_eq!(id.to_guid(), guid::create_gts(id.as_str()).unwrap());
        assert_eq!(
            id.to_guid().to_string(),
            "091dc30a-483e-57c4-867f-db0f523c009e"
        );
    }

    #[test]
    fn test_matches_reflexive() {
        for s in [
            "gts.a.b.c.d.v1~",
            "gts.a.b.c.d.v1.0~e.f.g.h.v2~",
            "gts.a.b.c.d.v1~e.f.g.h.v2.1",
        ] {
            let id = id(s);
            assert!(id.matches(&id), "{s} should match itself");
        }
        // Instance text is also valid pattern text.
        let instance = id("gts.a.b.c.d.v1~e.f.g.h.v2.1");
        assert!(instance.matches_str("gts.a.b.c.d.v1~e.f.g.h.v2.1"));
    }

    #[test]
    fn test_matches_field_wildcard() {
        let candidate = id("gts.vendor.package.namespace.type.v1.0~other.p.n.t.v2");
        assert!(candidate.matches_str("gts.vendor.*"));
        assert!(candidate.matches_str("gts.vendor.package.*"));
        assert!(candidate.matches_str("gts.vendor.package.namespace.type.*"));
        assert!(!candidate.matches_str("gts.other.*"));
        assert!(!candidate.matches_str("gts.vendor.pkg.*"));
    }

    #[test]
    fn test_matches_chained_wildcard() {
        let candidate = id("gts.x.core.events.event.v1~x.app.orders.created.v1.2");
        assert!(candidate.matches_str("gts.x.core.events.event.v1~x.app.*"));
        assert!(!candidate.matches_str("gts.x.core.events.event.v2~x.app.*"));
        assert!(!candidate.matches_str("gts.x.core.events.event.v1~y.*"));
    }

    #[test]
    fn test_wildcard_segment_skips_remaining_candidate_segments() {
        let candidate = id("gts.a.b.c.d.v1~e.f.g.h.v1~i.j.k.l.v1~");
        assert!(candidate.matches_str("gts.a.*"));
        assert!(candidate.matches_str("gts.a.b.c.d.v1~e.*"));
    }

    #[test]
    fn test_matches_star_placement() {
        let candidate = id("gts.a.b.c.d.v1~e.f.g.h.v1");
        assert!(!candidate.matches_str("gts.a.*~e.f.g.h.v1"));
        assert!(!candidate.matches_str("gts.a.*~e.*"));
    }

    #[test]
    fn test_star_check_applies_to_pattern_string_only() {
        let candidate = id("gts.a.b.c.d.v1~e.f.g.h.v1");
        let pattern = GtsId::parse_pattern("gts.a.*~e.f.g.h.v1").unwrap();
        assert!(!candidate.matches(&pattern));

        // Open segment produced without any star.
        let pattern = GtsId::parse_pattern("gts.a.b").unwrap();
        assert!(candidate.matches(&pattern));
    }

    #[test]
    fn test_matches_minor_version_semantics() {
        let no_minor = id("gts.a.b.c.d.v1");
        let minor_zero = id("gts.a.b.c.d.v1.0");
        let minor_three = id("gts.a.b.c.d.v1.3");

        assert!(no_minor.matches_str("gts.a.b.c.d.v1"));
        assert!(minor_zero.matches_str("gts.a.b.c.d.v1"));
        assert!(minor_three.matches_str("gts.a.b.c.d.v1"));

        assert!(minor_zero.matches_str("gts.a.b.c.d.v1.0"));
        assert!(!no_minor.matches_str("gts.a.b.c.d.v1.0"));
        assert!(!minor_three.matches_str("gts.a.b.c.d.v1.0"));
    }

    #[test]
    fn test_matches_segment_count() {
        let short = id("gts.a.b.c.d.v1");
        assert!(!short.matches_str("gts.a.b.c.d.v1~e.f.g.h.v1"));

        let long = id("gts.a.b.c.d.v1~e.f.g.h.v1");
        assert!(!long.matches_str("gts.a.b.c.d.v1"));
        assert!(long.matches_str("gts.a.b.c.d.v1~e.f.g.h.v1"));
    }

    #[test]
    fn test_matches_str_fails_closed() {
        let candidate = id("gts.a.b.c.d.v1");
        assert!(!candidate.matches_str(""));
        assert!(!candidate.matches_str("*"));
        assert!(!candidate.matches_str("gts.A.*"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = id("gts.a.b.c.d.v1~");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"gts.a.b.c.d.v1~\"");
        let parsed: GtsId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);

        let pattern: GtsId = serde_json::from_str("\"gts.a.*\"").unwrap();
        assert!(pattern.is_pattern());

        assert!(serde_json::from_str::<GtsId>("\"nope\"").is_err());
    }

    #[test]
    fn test_from_str() {
        let parsed: GtsId = "gts.a.b.c.d.v1".parse().unwrap();
        assert!(parsed.is_instance());
        assert!("gts.".parse::<GtsId>().is_err());
    }
}
