//! Classification data model
//!
//! Records produced by the two comparison phases and the classification
//! engine. All are created once per session and never patched.

use serde::{Deserialize, Serialize};
use vmerge_object::ObjectId;

/// What the vendor did to an object between Base and NewVendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeltaCategory {
    /// Present only in NewVendor
    New,
    /// Present in both, contents differ
    Modified,
    /// Present only in Base
    Deprecated,
}

impl DeltaCategory {
    /// Vendor change type implied by the category
    #[inline]
    #[must_use]
    pub fn vendor_change_type(self) -> ChangeType {
        match self {
            Self::New => ChangeType::Added,
            Self::Modified => ChangeType::Modified,
            Self::Deprecated => ChangeType::Removed,
        }
    }
}

/// Direction of a change on one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    /// Object introduced
    Added,
    /// Object edited
    Modified,
    /// Object removed
    Removed,
}

/// Merge category of a working-set object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// Vendor change can be taken as is
    NoConflict,
    /// Vendor and customer both changed the object
    Conflict,
    /// Vendor added the object
    New,
    /// Vendor modified an object the customer deleted
    Deleted,
}

impl Classification {
    /// All classifications
    pub const ALL: [Classification; 4] = [Self::NoConflict, Self::Conflict, Self::New, Self::Deleted];

    /// Label used by the persistence layer
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoConflict => "NO_CONFLICT",
            Self::Conflict => "CONFLICT",
            Self::New => "NEW",
            Self::Deleted => "DELETED",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vendor delta for one object (A -> C)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaResult {
    /// Identity
    pub object_id: ObjectId,
    /// Delta category
    pub category: DeltaCategory,
    /// Version-token strategy saw a change
    pub version_changed: bool,
    /// Content strategy saw a change
    pub content_changed: bool,
    /// Comparison fallback note, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveat: Option<String>,
}

impl DeltaResult {
    /// Vendor change type
    #[inline]
    #[must_use]
    pub fn vendor_change_type(&self) -> ChangeType {
        self.category.vendor_change_type()
    }
}

/// Customer check for one delta object (A -> B)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerModification {
    /// Identity
    pub object_id: ObjectId,
    /// Customer package contains the object
    pub exists_in_customer: bool,
    /// Customer changed the object relative to Base
    pub customer_modified: bool,
    /// Base version exists (distinguishes customer deletion from never-present)
    pub exists_in_base: bool,
    /// Comparison fallback note, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caveat: Option<String>,
}

impl CustomerModification {
    /// Customer change type, `None` when the customer left the object alone
    #[must_use]
    pub fn customer_change_type(&self) -> Option<ChangeType> {
        match (self.exists_in_base, self.exists_in_customer) {
            (false, true) => Some(ChangeType::Added),
            (true, false) => Some(ChangeType::Removed),
            (true, true) if self.customer_modified => Some(ChangeType::Modified),
            _ => None,
        }
    }
}

/// Classified working-set entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedChange {
    /// Identity
    pub object_id: ObjectId,
    /// Merge category
    pub classification: Classification,
    /// What the vendor did
    pub vendor_change_type: ChangeType,
    /// What the customer did, if anything
    pub customer_change_type: Option<ChangeType>,
    /// Dense zero-based review position, set by ordering
    pub display_order: Option<usize>,
}

impl ClassifiedChange {
    /// Copy with review position assigned
    #[inline]
    #[must_use]
    pub fn with_display_order(mut self, order: usize) -> Self {
        self.display_order = Some(order);
        self
    }
}
