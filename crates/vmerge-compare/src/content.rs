//! Content strategy
//!
//! Compares normalized structural detail, falling back to extractor
//! fingerprints when no detail is available.

use crate::strategy::{ComparisonError, ComparisonStrategy, Verdict};
use std::collections::BTreeSet;
use vmerge_object::{normalize_whitespace, ContentFingerprint, ObjectVersion, StructuralDetail};

/// Compares content after normalization
///
/// Sections listed in `ignored_sections` never count as a difference, so a
/// metadata-only re-save (new timestamp, new version uuid in the payload)
/// compares equal.
#[derive(Debug, Clone)]
pub struct ContentStrategy {
    normalize_whitespace: bool,
    ignored_sections: BTreeSet<String>,
}

impl ContentStrategy {
    /// Create strategy with whitespace normalization and no ignored sections
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            normalize_whitespace: true,
            ignored_sections: BTreeSet::new(),
        }
    }

    /// Toggle whitespace normalization
    #[inline]
    #[must_use]
    pub fn with_normalize_whitespace(mut self, enabled: bool) -> Self {
        self.normalize_whitespace = enabled;
        self
    }

    /// Exclude section keys from comparison
    #[must_use]
    pub fn with_ignored_sections<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_sections.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Normalized text of one section, `None` if the key is ignored
    #[must_use]
    pub fn normalize_section(&self, key: &str, text: &str) -> Option<String> {
        if self.ignored_sections.contains(key) {
            return None;
        }
        Some(if self.normalize_whitespace {
            normalize_whitespace(text)
        } else {
            text.to_string()
        })
    }

    /// Fingerprint of the comparable part of `detail`
    #[must_use]
    pub fn fingerprint(&self, detail: &StructuralDetail) -> ContentFingerprint {
        let parts: Vec<(&str, String)> = detail
            .sections
            .iter()
            .filter_map(|(key, text)| {
                self.normalize_section(key, text)
                    .map(|normalized| (key.as_str(), normalized))
            })
            .collect();
        ContentFingerprint::compute_parts(parts.iter().map(|(k, v)| (*k, v.as_str())))
    }

    fn check_well_formed(version: &ObjectVersion) -> Result<(), ComparisonError> {
        if version.structural_detail.is_well_formed() {
            Ok(())
        } else {
            Err(ComparisonError::MalformedDetail {
                role: version.role,
                errors: version.structural_detail.parse_errors.clone(),
            })
        }
    }

    fn has_content(version: &ObjectVersion) -> bool {
        !version.structural_detail.is_empty() || version.content_fingerprint.is_some()
    }
}

impl Default for ContentStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ComparisonStrategy for ContentStrategy {
    fn differs(
        &self,
        before: &ObjectVersion,
        after: &ObjectVersion,
    ) -> Result<Verdict, ComparisonError> {
        Self::check_well_formed(before)?;
        Self::check_well_formed(after)?;

        let (a, b) = (&before.structural_detail, &after.structural_detail);
        if !a.is_empty() && !b.is_empty() {
            return Ok(Verdict::from_differs(self.fingerprint(a) != self.fingerprint(b)));
        }

        if let (Some(fa), Some(fb)) = (before.content_fingerprint, after.content_fingerprint) {
            // Derived and extractor digests hash different inputs
            if before.fingerprint_derived != after.fingerprint_derived {
                return Err(ComparisonError::NoContent);
            }
            return Ok(Verdict::from_differs(fa != fb));
        }

        match (Self::has_content(before), Self::has_content(after)) {
            (false, false) => Err(ComparisonError::NoContent),
            // One side has content the other lacks
            _ => Ok(Verdict::Differs),
        }
    }

    fn name(&self) -> &'static str {
        "Content"
    }
}
