//! Version-identifier strategy
//!
//! Cheap pre-check comparing opaque version markers.

use crate::strategy::{ComparisonError, ComparisonStrategy, Verdict};
use vmerge_object::ObjectVersion;

/// Compares `version_token` values
///
/// Inconclusive when either side has no token.
#[derive(Debug, Clone, Copy)]
pub struct VersionTokenStrategy {
    case_sensitive: bool,
}

impl VersionTokenStrategy {
    /// Create case-sensitive strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            case_sensitive: true,
        }
    }

    /// Set case sensitivity (version uuids are often re-cased by exporters)
    #[inline]
    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

impl Default for VersionTokenStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ComparisonStrategy for VersionTokenStrategy {
    fn differs(
        &self,
        before: &ObjectVersion,
        after: &ObjectVersion,
    ) -> Result<Verdict, ComparisonError> {
        let (Some(a), Some(b)) = (&before.version_token, &after.version_token) else {
            return Ok(Verdict::Inconclusive);
        };
        let (a, b) = (a.trim(), b.trim());
        if a.is_empty() || b.is_empty() {
            return Ok(Verdict::Inconclusive);
        }

        let same = if self.case_sensitive {
            a == b
        } else {
            a.eq_ignore_ascii_case(b)
        };
        Ok(Verdict::from_differs(!same))
    }

    fn name(&self) -> &'static str {
        "VersionToken"
    }
}
