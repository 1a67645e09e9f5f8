//! Error types for the merge session
//!
//! [`MergeError`] aggregates the per-crate errors. Comparison failures
//! never surface here; the comparison phases record them as caveats.

use crate::config::ConfigError;
use vmerge_classify::ClassificationError;
use vmerge_object::RegistryError;

/// Main session error type
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Extraction handed over inconsistent versions
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Classification table could not be applied
    #[error("classification failed: {0}")]
    Classification(#[from] ClassificationError),

    /// Report could not be rendered
    #[error("report serialization failed: {0}")]
    Report(#[from] serde_json::Error),
}

impl MergeError {
    /// Whether the session must be discarded and recreated from scratch
    ///
    /// Configuration, registry and classification faults abort the
    /// session. A report failure concerns one rendering and leaves the
    /// session usable.
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Registry(_) | Self::Classification(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmerge_object::{ObjectId, PackageRole};

    #[test]
    fn merge_error_display() {
        let err = MergeError::from(RegistryError::DuplicateVersion {
            uuid: "abc".to_string(),
            role: PackageRole::Customer,
        });
        assert!(err.to_string().contains("registry error"));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn fatal_flags() {
        let duplicate = MergeError::from(RegistryError::DuplicateVersion {
            uuid: "abc".to_string(),
            role: PackageRole::Base,
        });
        assert!(duplicate.is_fatal());

        let table = MergeError::from(ClassificationError::MissingCustomerRecord {
            object_id: ObjectId(4),
        });
        assert!(table.is_fatal());

        let report = MergeError::from(serde_json::from_str::<u8>("x").unwrap_err());
        assert!(!report.is_fatal());
    }
}
