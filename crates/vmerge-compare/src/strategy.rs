//! Comparison strategy trait and core types
//!
//! Provides the [`ComparisonStrategy`] trait used by both comparison phases
//! (vendor delta and customer check).

use vmerge_object::{ObjectVersion, PackageRole};

/// Equality predicate over two versions of the same identity
///
/// Implementations must be deterministic: the same pair of versions always
/// yields the same verdict.
pub trait ComparisonStrategy: Send + Sync + std::fmt::Debug {
    /// Compare `before` against `after`
    ///
    /// # Errors
    /// Returns [`ComparisonError`] when the versions cannot be compared at
    /// all under this strategy (malformed or missing content).
    fn differs(
        &self,
        before: &ObjectVersion,
        after: &ObjectVersion,
    ) -> Result<Verdict, ComparisonError>;

    /// Strategy name (for debugging/serialization)
    fn name(&self) -> &'static str;
}

/// Outcome of a single strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Versions are equivalent
    Same,

    /// Versions differ
    Differs,

    /// Strategy has nothing to compare (e.g. no version tokens)
    Inconclusive,
}

impl Verdict {
    /// Build from a plain inequality check
    #[inline]
    #[must_use]
    pub fn from_differs(differs: bool) -> Self {
        if differs {
            Self::Differs
        } else {
            Self::Same
        }
    }

    /// Check if the verdict reports a change
    #[inline]
    #[must_use]
    pub fn is_change(self) -> bool {
        matches!(self, Self::Differs)
    }
}

/// Comparison errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComparisonError {
    /// Extractor flagged the structural detail as unparseable
    #[error("malformed {role} structural detail: {}", .errors.join("; "))]
    MalformedDetail {
        /// Role of the offending version
        role: PackageRole,
        /// Extractor messages
        errors: Vec<String>,
    },

    /// Neither side carries comparable content: no detail, and no
    /// fingerprints of the same origin
    #[error("no content to compare")]
    NoContent,
}
