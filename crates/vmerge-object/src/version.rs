//! Package-specific object versions
//!
//! An [`ObjectVersion`] is the snapshot of one identity inside one package.
//! Its [`StructuralDetail`] is an ordered map of section key to text, as
//! produced by the external extractor (SAIL expressions, field lists, node
//! lists and so on).

use crate::fingerprint::ContentFingerprint;
use crate::identity::{ObjectId, ObjectType, PackageRole};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Type-specific payload of an object version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralDetail {
    /// Section key -> section text, in extractor order
    #[serde(default)]
    pub sections: IndexMap<String, String>,

    /// Parse problems the extractor hit while building this payload
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parse_errors: Vec<String>,
}

impl StructuralDetail {
    /// Create empty detail
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section (builder style)
    #[must_use]
    pub fn with_section(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.sections.insert(key.into(), text.into());
        self
    }

    /// Record an extractor parse problem (builder style)
    #[must_use]
    pub fn with_parse_error(mut self, message: impl Into<String>) -> Self {
        self.parse_errors.push(message.into());
        self
    }

    /// Section text by key
    #[inline]
    #[must_use]
    pub fn section(&self, key: &str) -> Option<&str> {
        self.sections.get(key).map(String::as_str)
    }

    /// Whether the payload carries any sections
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Whether the extractor parsed this payload cleanly
    #[inline]
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.parse_errors.is_empty()
    }

    /// Fingerprint of whitespace-normalized sections
    #[must_use]
    pub fn fingerprint(&self) -> ContentFingerprint {
        let normalized: Vec<(&str, String)> = self
            .sections
            .iter()
            .map(|(key, text)| (key.as_str(), normalize_whitespace(text)))
            .collect();
        ContentFingerprint::compute_parts(normalized.iter().map(|(k, v)| (*k, v.as_str())))
    }
}

/// Collapse whitespace runs to a single space and trim the ends
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Kind of structural reference between two objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum DependencyKind {
    /// Plain reference (default)
    #[default]
    References,
    /// Calls the target (rule invocation, process node running an interface)
    Invokes,
    /// Uses the target as a data type
    UsesType,
    /// Anything else the extractor reports
    Other,
}

/// Outgoing reference recorded on a version
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyRef {
    /// External uuid of the referenced object
    pub target_uuid: String,
    /// Reference kind
    #[serde(default)]
    pub kind: DependencyKind,
}

impl DependencyRef {
    /// Plain reference to `target_uuid`
    #[must_use]
    pub fn to(target_uuid: impl Into<String>) -> Self {
        Self {
            target_uuid: target_uuid.into(),
            kind: DependencyKind::References,
        }
    }

    /// Reference with explicit kind
    #[must_use]
    pub fn with_kind(target_uuid: impl Into<String>, kind: DependencyKind) -> Self {
        Self {
            target_uuid: target_uuid.into(),
            kind,
        }
    }
}

/// Snapshot of one identity inside one package. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectVersion {
    /// Owning identity
    pub object_id: ObjectId,
    /// Package the snapshot came from
    pub role: PackageRole,
    /// Opaque version marker (e.g. a version uuid)
    pub version_token: Option<String>,
    /// Digest of the structural detail
    pub content_fingerprint: Option<ContentFingerprint>,
    /// `content_fingerprint` was computed from the detail rather than
    /// supplied by the extractor. Digests of different origin never compare.
    #[serde(default)]
    pub fingerprint_derived: bool,
    /// Type-specific payload
    pub structural_detail: StructuralDetail,
    /// Outgoing references
    pub dependencies: Vec<DependencyRef>,
}

/// One object as handed over by the extraction subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedObject {
    /// Globally unique external uuid
    pub uuid: String,
    /// Display name
    pub name: String,
    /// Object category
    pub object_type: ObjectType,
    /// Opaque version marker
    #[serde(default)]
    pub version_token: Option<String>,
    /// Precomputed fingerprint; derived from the detail when absent
    #[serde(default)]
    pub content_fingerprint: Option<ContentFingerprint>,
    /// Type-specific payload
    #[serde(default)]
    pub structural_detail: StructuralDetail,
    /// Outgoing references
    #[serde(default)]
    pub dependency_references: Vec<DependencyRef>,
}

impl ExtractedObject {
    /// Create a record with no content
    #[must_use]
    pub fn new(uuid: impl Into<String>, name: impl Into<String>, object_type: ObjectType) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            object_type,
            version_token: None,
            content_fingerprint: None,
            structural_detail: StructuralDetail::default(),
            dependency_references: Vec::new(),
        }
    }

    /// Set version token
    #[must_use]
    pub fn with_version_token(mut self, token: impl Into<String>) -> Self {
        self.version_token = Some(token.into());
        self
    }

    /// Set structural detail
    #[must_use]
    pub fn with_detail(mut self, detail: StructuralDetail) -> Self {
        self.structural_detail = detail;
        self
    }

    /// Add an outgoing reference
    #[must_use]
    pub fn with_dependency(mut self, dependency: DependencyRef) -> Self {
        self.dependency_references.push(dependency);
        self
    }

    /// Build the version record for `object_id` in `role`
    ///
    /// A missing fingerprint is derived from well-formed, non-empty detail.
    #[must_use]
    pub fn into_version(self, object_id: ObjectId, role: PackageRole) -> ObjectVersion {
        let detail = &self.structural_detail;
        let (content_fingerprint, fingerprint_derived) = match self.content_fingerprint {
            Some(supplied) => (Some(supplied), false),
            None if detail.is_well_formed() && !detail.is_empty() => {
                (Some(detail.fingerprint()), true)
            }
            None => (None, false),
        };
        ObjectVersion {
            object_id,
            role,
            version_token: self.version_token,
            content_fingerprint,
            fingerprint_derived,
            structural_detail: self.structural_detail,
            dependencies: self.dependency_references,
        }
    }
}
