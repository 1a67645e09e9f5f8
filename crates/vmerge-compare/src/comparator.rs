//! Strategy composition
//!
//! A [`Comparator`] runs the version-token and content strategies side by
//! side and records both verdicts independently.

use crate::content::ContentStrategy;
use crate::strategy::{ComparisonStrategy, Verdict};
use crate::version_token::VersionTokenStrategy;
use serde::{Deserialize, Serialize};
use vmerge_object::ObjectVersion;

/// Comparison settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonOptions {
    /// Collapse whitespace before comparing section text
    pub normalize_whitespace: bool,
    /// Section keys that never count as a change
    pub ignored_sections: Vec<String>,
    /// Compare version tokens case-sensitively
    pub case_sensitive_tokens: bool,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            normalize_whitespace: true,
            ignored_sections: vec![
                "lastModified".to_string(),
                "lastModifiedBy".to_string(),
                "versionUuid".to_string(),
            ],
            case_sensitive_tokens: true,
        }
    }
}

/// Both verdicts for one pair of versions
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComparisonOutcome {
    /// Version-token strategy reported a difference
    pub version_changed: bool,
    /// Content strategy reported a difference
    pub content_changed: bool,
    /// Why the content verdict could not be trusted, if it could not
    pub caveat: Option<String>,
}

impl ComparisonOutcome {
    /// `version_changed OR content_changed`
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.version_changed || self.content_changed
    }
}

/// Runs a version strategy and a content strategy together
#[derive(Debug)]
pub struct Comparator {
    version: Box<dyn ComparisonStrategy>,
    content: Box<dyn ComparisonStrategy>,
}

impl Comparator {
    /// Comparator from explicit strategies
    #[must_use]
    pub fn new(
        version: Box<dyn ComparisonStrategy>,
        content: Box<dyn ComparisonStrategy>,
    ) -> Self {
        Self { version, content }
    }

    /// Built-in strategies configured from `options`
    #[must_use]
    pub fn from_options(options: &ComparisonOptions) -> Self {
        let version =
            VersionTokenStrategy::new().with_case_sensitive(options.case_sensitive_tokens);
        let content = ContentStrategy::new()
            .with_normalize_whitespace(options.normalize_whitespace)
            .with_ignored_sections(options.ignored_sections.iter().cloned());
        Self::new(Box::new(version), Box::new(content))
    }

    /// Replace the content strategy (e.g. with a semantic, expression-aware diff)
    #[must_use]
    pub fn with_content_strategy(mut self, content: Box<dyn ComparisonStrategy>) -> Self {
        self.content = content;
        self
    }

    /// Compare two versions of one identity
    ///
    /// A content-strategy failure never propagates. The outcome falls back
    /// to the version-token verdict and carries a caveat; when the token
    /// verdict is also inconclusive the pair is reported as changed so it
    /// surfaces for review.
    #[must_use]
    pub fn compare(&self, before: &ObjectVersion, after: &ObjectVersion) -> ComparisonOutcome {
        // Token strategies have no failure mode worth surfacing
        let version_verdict = self
            .version
            .differs(before, after)
            .unwrap_or(Verdict::Inconclusive);

        match self.content.differs(before, after) {
            Ok(verdict) => ComparisonOutcome {
                version_changed: version_verdict.is_change(),
                content_changed: verdict.is_change(),
                caveat: None,
            },
            Err(err) if version_verdict == Verdict::Inconclusive => ComparisonOutcome {
                version_changed: false,
                content_changed: true,
                caveat: Some(format!(
                    "{} comparison failed ({err}) and no version tokens to fall back on; treated as changed",
                    self.content.name()
                )),
            },
            Err(err) => ComparisonOutcome {
                version_changed: version_verdict.is_change(),
                content_changed: false,
                caveat: Some(format!(
                    "{} comparison failed ({err}); classified by {} only",
                    self.content.name(),
                    self.version.name()
                )),
            },
        }
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::from_options(&ComparisonOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmerge_object::{ExtractedObject, ObjectId, ObjectType, PackageRole, StructuralDetail};

    fn version(token: Option<&str>, detail: StructuralDetail) -> ObjectVersion {
        let mut obj = ExtractedObject::new("u", "Flow", ObjectType::ProcessModel).with_detail(detail);
        obj.version_token = token.map(str::to_string);
        obj.into_version(ObjectId(0), PackageRole::Base)
    }

    fn nodes(text: &str) -> StructuralDetail {
        StructuralDetail::new().with_section("nodes", text)
    }

    #[test]
    fn token_and_content_recorded_independently() {
        let cmp = Comparator::default();

        // Re-save: new token, same content
        let out = cmp.compare(&version(Some("v1"), nodes("start")), &version(Some("v2"), nodes("start")));
        assert!(out.version_changed);
        assert!(!out.content_changed);
        assert!(out.changed());

        // Same token, edited content
        let out = cmp.compare(&version(Some("v1"), nodes("start")), &version(Some("v1"), nodes("start, end")));
        assert!(!out.version_changed);
        assert!(out.content_changed);
    }

    #[test]
    fn unchanged_pair() {
        let cmp = Comparator::default();
        let out = cmp.compare(&version(Some("v1"), nodes("start")), &version(Some("v1"), nodes("start")));
        assert!(!out.changed());
        assert!(out.caveat.is_none());
    }

    #[test]
    fn content_failure_falls_back_to_token() {
        let cmp = Comparator::default();
        let broken = nodes("start").with_parse_error("bad xml");
        let out = cmp.compare(&version(Some("v1"), nodes("start")), &version(Some("v1"), broken));
        assert!(!out.changed());
        assert!(out.caveat.as_deref().unwrap().contains("VersionToken"));
    }

    #[test]
    fn content_failure_without_tokens_is_changed() {
        let cmp = Comparator::default();
        let broken = nodes("start").with_parse_error("bad xml");
        let out = cmp.compare(&version(None, nodes("start")), &version(None, broken));
        assert!(out.changed());
        assert!(out.caveat.is_some());
    }

    #[test]
    fn default_options_ignore_metadata_sections() {
        let opts = ComparisonOptions::default();
        assert!(opts.ignored_sections.contains(&"lastModified".to_string()));
        assert!(opts.normalize_whitespace);
    }
}
