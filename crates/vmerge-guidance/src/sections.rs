//! Section-level three-way diff
//!
//! Each side (Customer, NewVendor) is diffed against Base one section at a
//! time. Section text goes through the same normalization the content
//! comparison uses, so ignored metadata sections never show up here.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use vmerge_compare::ContentStrategy;
use vmerge_object::StructuralDetail;

/// What one side did to a section relative to Base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionChange {
    /// Same text as Base, or absent on both
    Unchanged,
    /// Absent from Base
    Added,
    /// Text differs from Base
    Modified,
    /// Present in Base, absent here
    Removed,
}

impl SectionChange {
    /// Compare one section's normalized text against Base
    #[must_use]
    pub fn between(base: Option<&str>, side: Option<&str>) -> Self {
        match (base, side) {
            (None, None) => Self::Unchanged,
            (None, Some(_)) => Self::Added,
            (Some(_), None) => Self::Removed,
            (Some(b), Some(s)) if b == s => Self::Unchanged,
            (Some(_), Some(_)) => Self::Modified,
        }
    }

    /// Anything but [`Unchanged`](Self::Unchanged)
    #[inline]
    #[must_use]
    pub fn is_change(self) -> bool {
        self != Self::Unchanged
    }
}

/// Per-section verdict for both sides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDiff {
    /// Section key
    pub key: String,
    /// Customer side
    pub customer: SectionChange,
    /// Vendor side
    pub vendor: SectionChange,
    /// Both sides changed the section and ended up with different text
    pub conflicting: bool,
}

/// Diff all sections of the three details
///
/// Keys come out in first-seen order: Base, then NewVendor, then Customer.
/// A missing detail is treated as having no sections. Identical changes on
/// both sides are convergent and not conflicting.
#[must_use]
pub fn diff_sections(
    base: Option<&StructuralDetail>,
    customer: Option<&StructuralDetail>,
    vendor: Option<&StructuralDetail>,
    normalizer: &ContentStrategy,
) -> Vec<SectionDiff> {
    let mut keys: IndexSet<&str> = IndexSet::new();
    for detail in [base, vendor, customer].into_iter().flatten() {
        keys.extend(detail.sections.keys().map(String::as_str));
    }

    let text = |detail: Option<&StructuralDetail>, key: &str| -> Option<String> {
        detail
            .and_then(|d| d.section(key))
            .and_then(|t| normalizer.normalize_section(key, t))
    };

    keys.into_iter()
        .filter(|key| normalizer.normalize_section(key, "").is_some())
        .map(|key| {
            let b = text(base, key);
            let c = text(customer, key);
            let v = text(vendor, key);
            let customer_change = SectionChange::between(b.as_deref(), c.as_deref());
            let vendor_change = SectionChange::between(b.as_deref(), v.as_deref());
            SectionDiff {
                key: key.to_string(),
                customer: customer_change,
                vendor: vendor_change,
                conflicting: customer_change.is_change() && vendor_change.is_change() && c != v,
            }
        })
        .collect()
}
