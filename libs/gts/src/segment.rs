//! Owned segment model.

use crate::parser::ParsedSegment;

/// One `vendor.package.namespace.type.version` unit of a [`GtsId`](crate::GtsId).
///
/// Type and instance identifiers always carry every name component and a major
/// version. Pattern segments may leave trailing components unset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GtsIdSegment {
    vendor: String,
    package: Option<String>,
    namespace: Option<String>,
    type_name: Option<String>,
    version_major: Option<u32>,
    version_minor: Option<u32>,
    is_wildcard: bool,
}

impl GtsIdSegment {
    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The `type` component.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn version_major(&self) -> Option<u32> {
        self.version_major
    }

    pub fn version_minor(&self) -> Option<u32> {
        self.version_minor
    }

    /// True for pattern segments that omit trailing components or end in `*`.
    pub fn is_wildcard(&self) -> bool {
        self.is_wildcard
    }

    /// Exact comparison used for closed pattern segments.
    ///
    /// A pattern without a minor version accepts any candidate minor, including none.
    pub(crate) fn matches_exact(&self, candidate: &GtsIdSegment) -> bool {
        self.vendor == candidate.vendor
            && self.package == candidate.package
            && self.namespace == candidate.namespace
            && self.type_name == candidate.type_name
            && self.version_major == candidate.version_major
            && self.minor_accepts(candidate)
    }

    /// Comparison used for open pattern segments: unset fields impose no constraint.
    pub(crate) fn matches_open(&self, candidate: &GtsIdSegment) -> bool {
        fn field_accepts(pattern: Option<&str>, candidate: Option<&str>) -> bool {
            match pattern {
                Some(p) if !p.is_empty() => candidate == Some(p),
                _ => true,
            }
        }

        (self.vendor.is_empty() || self.vendor == candidate.vendor)
            && field_accepts(self.package(), candidate.package())
            && field_accepts(self.namespace(), candidate.namespace())
            && field_accepts(self.type_name(), candidate.type_name())
            && self
                .version_major
                .is_none_or(|major| candidate.version_major == Some(major))
            && self.minor_accepts(candidate)
    }

    fn minor_accepts(&self, candidate: &GtsIdSegment) -> bool {
        match self.version_minor {
            Some(minor) => candidate.version_minor == Some(minor),
            None => true,
        }
    }
}

impl From<&ParsedSegment<'_>> for GtsIdSegment {
    fn from(parsed: &ParsedSegment<'_>) -> Self {
        Self {
            vendor: parsed.vendor.to_string(),
            package: parsed.package.map(str::to_string),
            namespace: parsed.namespace.map(str::to_string),
            type_name: parsed.type_name.map(str::to_string),
            version_major: parsed.version.map(|v| v.major),
            version_minor: parsed.version.and_then(|v| v.minor),
            is_wildcard: parsed.wildcard,
        }
    }
}
