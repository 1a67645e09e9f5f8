//! Merge guidance
//!
//! Turns a classified change plus its three versions into a recommendation
//! with a templated reason. Precedence:
//!
//! 1. Any conflicting section: [`Recommendation::ManualMerge`]
//! 2. Vendor section changes that do not overlap customer edits:
//!    [`Recommendation::IncorporateVendorAdditions`]
//! 3. Nothing to reconcile at section level: [`Recommendation::KeepCustomer`]
//!
//! NEW and vendor-modified NO_CONFLICT changes recommend
//! [`Recommendation::AcceptVendor`] unless the customer independently added
//! different content under the same uuid.

use crate::sections::{diff_sections, SectionChange, SectionDiff};
use serde::{Deserialize, Serialize};
use vmerge_classify::{ChangeType, Classification, ClassifiedChange};
use vmerge_compare::{ComparisonOptions, ContentStrategy};
use vmerge_object::{PackageRole, VersionSet};

/// Suggested resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    /// Fold the vendor's non-overlapping changes into the customer version
    IncorporateVendorAdditions,
    /// Both sides changed the same sections
    ManualMerge,
    /// Keep the customer version
    KeepCustomer,
    /// Take the vendor version as is
    AcceptVendor,
}

impl Recommendation {
    /// Label used by the persistence layer
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IncorporateVendorAdditions => "INCORPORATE_VENDOR_ADDITIONS",
            Self::ManualMerge => "MANUAL_MERGE",
            Self::KeepCustomer => "KEEP_CUSTOMER",
            Self::AcceptVendor => "ACCEPT_VENDOR",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Guidance for one working-set object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeGuidance {
    /// Suggested resolution
    pub recommendation: Recommendation,
    /// Short explanation built from the section lists
    pub reason: String,
    /// Sections both sides changed differently
    pub conflicting_sections: Vec<String>,
    /// Sections the vendor introduced
    pub vendor_additions: Vec<String>,
    /// Sections the vendor changed
    pub vendor_modifications: Vec<String>,
    /// Sections the vendor dropped
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vendor_removals: Vec<String>,
}

impl MergeGuidance {
    fn from_diffs(recommendation: Recommendation, diffs: &[SectionDiff]) -> Self {
        Self {
            recommendation,
            reason: String::new(),
            conflicting_sections: section_keys(diffs, |d| d.conflicting),
            vendor_additions: section_keys(diffs, |d| d.vendor == SectionChange::Added),
            vendor_modifications: section_keys(diffs, |d| d.vendor == SectionChange::Modified),
            vendor_removals: section_keys(diffs, |d| d.vendor == SectionChange::Removed),
        }
    }

    #[must_use]
    fn with_reason(mut self, reason: String) -> Self {
        self.reason = reason;
        self
    }

    fn vendor_summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.vendor_additions.is_empty() {
            parts.push(format!("added {}", self.vendor_additions.join(", ")));
        }
        if !self.vendor_modifications.is_empty() {
            parts.push(format!("modified {}", self.vendor_modifications.join(", ")));
        }
        if !self.vendor_removals.is_empty() {
            parts.push(format!("removed {}", self.vendor_removals.join(", ")));
        }
        parts.join("; ")
    }
}

fn section_keys(diffs: &[SectionDiff], pred: impl Fn(&SectionDiff) -> bool) -> Vec<String> {
    diffs.iter().filter(|d| pred(d)).map(|d| d.key.clone()).collect()
}

/// Which non-conflict changes get guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidanceOptions {
    /// Emit ACCEPT_VENDOR guidance for vendor-modified NO_CONFLICT changes
    pub include_no_conflict: bool,
    /// Emit guidance for NEW objects that carry content
    pub include_new: bool,
}

impl Default for GuidanceOptions {
    fn default() -> Self {
        Self {
            include_no_conflict: true,
            include_new: true,
        }
    }
}

/// Produces [`MergeGuidance`] for classified changes
#[derive(Debug, Clone)]
pub struct GuidanceGenerator {
    options: GuidanceOptions,
    normalizer: ContentStrategy,
}

impl GuidanceGenerator {
    /// Generator sharing the content comparison's normalization
    #[must_use]
    pub fn new(options: GuidanceOptions, comparison: &ComparisonOptions) -> Self {
        Self {
            options,
            normalizer: ContentStrategy::new()
                .with_normalize_whitespace(comparison.normalize_whitespace)
                .with_ignored_sections(comparison.ignored_sections.iter().cloned()),
        }
    }

    /// Guidance for `change`, or `None` when there is nothing to advise on
    ///
    /// DELETED changes and untouched vendor removals never get guidance.
    #[must_use]
    pub fn generate(&self, change: &ClassifiedChange, versions: &VersionSet) -> Option<MergeGuidance> {
        let detail = |role: PackageRole| versions.get(role).map(|v| &v.structural_detail);
        let base = detail(PackageRole::Base);
        let customer = detail(PackageRole::Customer);
        let vendor = detail(PackageRole::NewVendor);
        let diffs = diff_sections(base, customer, vendor, &self.normalizer);

        let guidance = match change.classification {
            Classification::Conflict if change.vendor_change_type == ChangeType::Removed => {
                let mut guidance = MergeGuidance::from_diffs(Recommendation::KeepCustomer, &diffs);
                guidance.conflicting_sections = section_keys(&diffs, |d| d.customer.is_change());
                Some(guidance.with_reason(
                    "vendor removed an object the customer modified; keep the customer version or honor the removal"
                        .to_string(),
                ))
            }
            Classification::Conflict => Some(Self::conflict(&diffs)),
            Classification::New => {
                let has_content = vendor.is_some_and(|d| !d.is_empty());
                (self.options.include_new && has_content).then(|| Self::addition(&diffs))
            }
            Classification::NoConflict => (self.options.include_no_conflict
                && change.vendor_change_type == ChangeType::Modified)
                .then(|| {
                    let guidance = MergeGuidance::from_diffs(Recommendation::AcceptVendor, &diffs);
                    let reason = if guidance.vendor_summary().is_empty() {
                        "customer did not modify the object; vendor changed version metadata only".to_string()
                    } else {
                        format!(
                            "customer did not modify the object; vendor {}",
                            guidance.vendor_summary()
                        )
                    };
                    guidance.with_reason(reason)
                }),
            Classification::Deleted => None,
        };

        if let Some(g) = &guidance {
            tracing::debug!(
                object = %change.object_id,
                classification = ?change.classification,
                recommendation = %g.recommendation,
                conflicting = g.conflicting_sections.len(),
                "merge guidance"
            );
        }
        guidance
    }

    fn conflict(diffs: &[SectionDiff]) -> MergeGuidance {
        let guidance = MergeGuidance::from_diffs(Recommendation::ManualMerge, diffs);

        if !guidance.conflicting_sections.is_empty() {
            let reason = format!(
                "customer and vendor both changed {}",
                guidance.conflicting_sections.join(", ")
            );
            return guidance.with_reason(reason);
        }
        if diffs.is_empty() {
            return guidance
                .with_reason("no section detail available; compare the versions by hand".to_string());
        }

        let summary = guidance.vendor_summary();
        if summary.is_empty() {
            let mut guidance = guidance;
            guidance.recommendation = Recommendation::KeepCustomer;
            return guidance.with_reason(
                "vendor changes do not touch any compared section; customer content can be kept"
                    .to_string(),
            );
        }

        let mut guidance = guidance;
        guidance.recommendation = Recommendation::IncorporateVendorAdditions;
        let reason = format!("customer edits do not overlap vendor changes; vendor {summary}");
        guidance.with_reason(reason)
    }

    fn addition(diffs: &[SectionDiff]) -> MergeGuidance {
        let guidance = MergeGuidance::from_diffs(Recommendation::AcceptVendor, diffs);
        if guidance.conflicting_sections.is_empty() {
            let summary = guidance.vendor_summary();
            let reason = if summary.is_empty() {
                "new vendor object; content limited to ignored metadata sections".to_string()
            } else {
                format!("new vendor object; {summary}")
            };
            guidance.with_reason(reason)
        } else {
            let reason = format!(
                "customer already added this object with different {}",
                guidance.conflicting_sections.join(", ")
            );
            let mut guidance = guidance;
            guidance.recommendation = Recommendation::ManualMerge;
            guidance.with_reason(reason)
        }
    }
}

impl Default for GuidanceGenerator {
    fn default() -> Self {
        Self::new(GuidanceOptions::default(), &ComparisonOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use vmerge_object::{ExtractedObject, ObjectRegistry, ObjectType, StructuralDetail};

    fn detail(sections: &[(&str, &str)]) -> StructuralDetail {
        sections
            .iter()
            .fold(StructuralDetail::new(), |d, (k, v)| d.with_section(*k, *v))
    }

    fn versions(
        base: Option<StructuralDetail>,
        customer: Option<StructuralDetail>,
        vendor: Option<StructuralDetail>,
    ) -> VersionSet {
        let registry = ObjectRegistry::new();
        let mut id = None;
        for (role, d) in [
            (PackageRole::Base, base),
            (PackageRole::Customer, customer),
            (PackageRole::NewVendor, vendor),
        ] {
            if let Some(d) = d {
                let obj = ExtractedObject::new("rule-1", "Calc Total", ObjectType::ExpressionRule)
                    .with_detail(d);
                id = Some(registry.register(role, obj).unwrap());
            }
        }
        registry.versions(id.unwrap())
    }

    fn change(classification: Classification, vendor: ChangeType) -> ClassifiedChange {
        ClassifiedChange {
            object_id: vmerge_object::ObjectId(0),
            classification,
            vendor_change_type: vendor,
            customer_change_type: None,
            display_order: None,
        }
    }

    #[test]
    fn overlapping_sections_need_manual_merge() {
        let set = versions(
            Some(detail(&[("expression", "v1")])),
            Some(detail(&[("expression", "v1-custom")])),
            Some(detail(&[("expression", "v2")])),
        );
        let guidance = GuidanceGenerator::default()
            .generate(&change(Classification::Conflict, ChangeType::Modified), &set)
            .unwrap();

        assert_eq!(guidance.recommendation, Recommendation::ManualMerge);
        assert_eq!(guidance.conflicting_sections, vec!["expression".to_string()]);
        assert_eq!(guidance.vendor_modifications, vec!["expression".to_string()]);
        assert!(guidance.reason.contains("expression"));
    }

    #[test]
    fn disjoint_edits_incorporate_vendor_changes() {
        let set = versions(
            Some(detail(&[("expression", "a"), ("inputs", "x")])),
            Some(detail(&[("expression", "a"), ("inputs", "x, y")])),
            Some(detail(&[("expression", "b"), ("inputs", "x"), ("tests", "t")])),
        );
        let guidance = GuidanceGenerator::default()
            .generate(&change(Classification::Conflict, ChangeType::Modified), &set)
            .unwrap();

        assert_eq!(guidance.recommendation, Recommendation::IncorporateVendorAdditions);
        assert!(guidance.conflicting_sections.is_empty());
        assert_eq!(guidance.vendor_additions, vec!["tests".to_string()]);
        assert_eq!(guidance.vendor_modifications, vec!["expression".to_string()]);
    }

    #[test]
    fn vendor_removal_of_customized_object_keeps_customer() {
        let set = versions(
            Some(detail(&[("expression", "a")])),
            Some(detail(&[("expression", "a2")])),
            None,
        );
        let guidance = GuidanceGenerator::default()
            .generate(&change(Classification::Conflict, ChangeType::Removed), &set)
            .unwrap();
        assert_eq!(guidance.recommendation, Recommendation::KeepCustomer);
        assert_eq!(guidance.conflicting_sections, vec!["expression".to_string()]);
    }

    #[test]
    fn new_object_with_content_is_accepted() {
        let set = versions(None, None, Some(detail(&[("fields", "id"), ("keys", "id")])));
        let guidance = GuidanceGenerator::default()
            .generate(&change(Classification::New, ChangeType::Added), &set)
            .unwrap();
        assert_eq!(guidance.recommendation, Recommendation::AcceptVendor);
        assert_eq!(guidance.vendor_additions, vec!["fields".to_string(), "keys".to_string()]);
    }

    #[test]
    fn new_object_without_content_gets_nothing() {
        let set = versions(None, None, Some(StructuralDetail::new()));
        assert!(GuidanceGenerator::default()
            .generate(&change(Classification::New, ChangeType::Added), &set)
            .is_none());
    }

    #[test]
    fn options_suppress_non_conflict_guidance() {
        let set = versions(
            Some(detail(&[("expression", "a")])),
            Some(detail(&[("expression", "a")])),
            Some(detail(&[("expression", "b")])),
        );
        let quiet = GuidanceGenerator::new(
            GuidanceOptions {
                include_no_conflict: false,
                include_new: false,
            },
            &ComparisonOptions::default(),
        );
        let modified = change(Classification::NoConflict, ChangeType::Modified);
        assert!(quiet.generate(&modified, &set).is_none());

        let guidance = GuidanceGenerator::default().generate(&modified, &set).unwrap();
        assert_eq!(guidance.recommendation, Recommendation::AcceptVendor);
    }

    #[test]
    fn deleted_and_safe_removals_get_nothing() {
        let set = versions(Some(detail(&[("expression", "a")])), None, None);
        let generator = GuidanceGenerator::default();
        assert!(generator
            .generate(&change(Classification::Deleted, ChangeType::Modified), &set)
            .is_none());
        assert!(generator
            .generate(&change(Classification::NoConflict, ChangeType::Removed), &set)
            .is_none());
    }

    #[test]
    fn addition_of_metadata_only_object_has_fixed_reason() {
        let set = versions(None, None, Some(detail(&[("lastModified", "2024-06-30")])));
        let guidance = GuidanceGenerator::default()
            .generate(&change(Classification::New, ChangeType::Added), &set)
            .unwrap();

        assert_eq!(guidance.recommendation, Recommendation::AcceptVendor);
        assert!(guidance.vendor_additions.is_empty());
        assert_eq!(
            guidance.reason,
            "new vendor object; content limited to ignored metadata sections"
        );
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn recommendation_is_logged_at_debug() {
        let set = versions(
            Some(detail(&[("expression", "v1")])),
            Some(detail(&[("expression", "v1-custom")])),
            Some(detail(&[("expression", "v2")])),
        );
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            GuidanceGenerator::default()
                .generate(&change(Classification::Conflict, ChangeType::Modified), &set)
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("merge guidance"));
        assert!(output.contains("recommendation=MANUAL_MERGE"));
        assert!(output.contains("conflicting=1"));
    }

    #[test]
    fn recommendation_labels() {
        let json = serde_json::to_string(&Recommendation::IncorporateVendorAdditions).unwrap();
        assert_eq!(json, "\"INCORPORATE_VENDOR_ADDITIONS\"");
        assert_eq!(Recommendation::ManualMerge.to_string(), "MANUAL_MERGE");
    }
}
