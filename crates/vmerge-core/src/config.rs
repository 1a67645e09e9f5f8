//! Session configuration
//!
//! [`MergeConfig`] groups the comparison, ordering and guidance settings.
//! Every field has a default, so an empty TOML document is a valid config.

use serde::{Deserialize, Serialize};
use vmerge_compare::ComparisonOptions;
use vmerge_guidance::GuidanceOptions;
use vmerge_order::OrderingOptions;

/// Merge session configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    /// Comparison strategy settings
    pub comparison: ComparisonOptions,
    /// Ordering settings
    pub ordering: OrderingOptions,
    /// Guidance settings
    pub guidance: GuidanceOptions,
}

impl MergeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// - [`ConfigError::Parse`] on invalid TOML or unknown top-level keys
    /// - [`ConfigError::Invalid`] if [`validate`](Self::validate) rejects it
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| {
            let line = e.span().map(|span| {
                toml_str[..span.start].chars().filter(|&c| c == '\n').count() + 1
            });
            ConfigError::Parse {
                line,
                message: e.message().to_owned(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    ///
    /// # Errors
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Set comparison settings
    #[inline]
    #[must_use]
    pub fn with_comparison(mut self, comparison: ComparisonOptions) -> Self {
        self.comparison = comparison;
        self
    }

    /// Set ordering settings
    #[inline]
    #[must_use]
    pub fn with_ordering(mut self, ordering: OrderingOptions) -> Self {
        self.ordering = ordering;
        self
    }

    /// Set guidance settings
    #[inline]
    #[must_use]
    pub fn with_guidance(mut self, guidance: GuidanceOptions) -> Self {
        self.guidance = guidance;
        self
    }

    /// Set the cycle-breaking ceiling
    #[inline]
    #[must_use]
    pub fn with_max_cycle_breaks(mut self, max: usize) -> Self {
        self.ordering.max_cycle_breaks = max;
        self
    }

    /// Add a section key excluded from content comparison
    #[must_use]
    pub fn with_ignored_section(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.comparison.ignored_sections.contains(&key) {
            self.comparison.ignored_sections.push(key);
        }
        self
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ordering.max_cycle_breaks == 0 {
            return Err(ConfigError::Invalid(
                "ordering.max_cycle_breaks must be at least 1".to_string(),
            ));
        }
        if self.comparison.ignored_sections.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "comparison.ignored_sections must not contain blank keys".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// TOML did not parse
    #[error("invalid config{}: {message}", .line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Parse {
        /// 1-based line of the error, when known
        line: Option<usize>,
        /// Parser message
        message: String,
    },

    /// Value out of range
    #[error("invalid config: {0}")]
    Invalid(String),

    /// TOML rendering failed
    #[error("could not serialize config: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = MergeConfig::from_toml_str("").unwrap();
        assert_eq!(config, MergeConfig::default());
        assert_eq!(config.ordering.max_cycle_breaks, 10_000);
        assert!(config.comparison.normalize_whitespace);
        assert!(config.guidance.include_new);
        assert!(config
            .comparison
            .ignored_sections
            .contains(&"lastModified".to_string()));
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = MergeConfig::from_toml_str(
            r#"
            [comparison]
            case_sensitive_tokens = false

            [guidance]
            include_no_conflict = false
            "#,
        )
        .unwrap();
        assert!(!config.comparison.case_sensitive_tokens);
        assert!(config.comparison.normalize_whitespace);
        assert!(!config.guidance.include_no_conflict);
        assert!(config.guidance.include_new);
    }

    #[test]
    fn zero_cycle_breaks_is_rejected() {
        let err = MergeConfig::from_toml_str("[ordering]\nmax_cycle_breaks = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(MergeConfig::new().with_max_cycle_breaks(0).validate().is_err());
    }

    #[test]
    fn blank_ignored_section_is_rejected() {
        let config = MergeConfig::new().with_ignored_section("  ");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unknown_top_level_key_is_a_parse_error() {
        let err = MergeConfig::from_toml_str("\n\nbogus = 1\n").unwrap_err();
        match err {
            ConfigError::Parse { message, .. } => assert!(message.contains("bogus")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn toml_round_trip() {
        let config = MergeConfig::new()
            .with_max_cycle_breaks(5)
            .with_ignored_section("auditTrail");
        let text = config.to_toml_string().unwrap();
        assert_eq!(MergeConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn with_ignored_section_does_not_duplicate() {
        let config = MergeConfig::new().with_ignored_section("lastModified");
        let count = config
            .comparison
            .ignored_sections
            .iter()
            .filter(|k| *k == "lastModified")
            .count();
        assert_eq!(count, 1);
    }
}
