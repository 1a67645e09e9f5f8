//! Merge session
//!
//! One [`MergeSession`] owns one registry and runs the full pipeline:
//!
//! 1. Vendor delta (Base vs NewVendor)
//! 2. Customer comparison (Base vs Customer) for delta objects
//! 3. Classification
//! 4. Dependency-aware ordering
//! 5. Guidance
//!
//! The pipeline either completes and yields a [`SessionReport`] or fails
//! as a whole; partial results are never returned.

use crate::config::MergeConfig;
use crate::error::MergeError;
use crate::ingest::{ingest_packages, IngestStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use vmerge_classify::{
    classify_all, compare_customer, compute_delta, ChangeType, Classification,
    CustomerModification, DeltaResult,
};
use vmerge_compare::Comparator;
use vmerge_guidance::{GuidanceGenerator, MergeGuidance};
use vmerge_object::{ExtractedObject, ObjectId, ObjectRegistry};
use vmerge_order::{order_changes, BrokenEdge};

/// Unique session identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Ulid);

impl SessionId {
    /// Generate new session id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One reviewable entry, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedChange {
    /// Identity
    pub object_id: ObjectId,
    /// Merge category
    pub classification: Classification,
    /// What the vendor did
    pub vendor_change_type: ChangeType,
    /// What the customer did, if anything
    pub customer_change_type: Option<ChangeType>,
    /// Dense zero-based review position
    pub display_order: usize,
    /// Reconciliation advice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance: Option<MergeGuidance>,
}

/// Per-session counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Working-set size
    pub total: usize,
    /// NO_CONFLICT changes
    pub no_conflict: usize,
    /// CONFLICT changes
    pub conflict: usize,
    /// NEW changes
    pub new: usize,
    /// DELETED changes
    pub deleted: usize,
    /// Delta and customer records carrying a comparison caveat
    pub caveats: usize,
    /// Changes with guidance attached
    pub with_guidance: usize,
    /// Dependency edges removed to break cycles
    pub broken_edges: usize,
    /// Cycle breaking hit its ceiling
    pub ordering_truncated: bool,
}

impl SessionSummary {
    /// Count for one classification
    #[must_use]
    pub fn count(&self, classification: Classification) -> usize {
        match classification {
            Classification::NoConflict => self.no_conflict,
            Classification::Conflict => self.conflict,
            Classification::New => self.new,
            Classification::Deleted => self.deleted,
        }
    }
}

/// Everything a session hands to the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Session identifier
    pub session_id: SessionId,
    /// When the pipeline ran
    pub created_at: DateTime<Utc>,
    /// Working set in display order
    pub changes: Vec<OrderedChange>,
    /// Raw vendor delta, in identity order
    pub deltas: Vec<DeltaResult>,
    /// Raw customer comparison, in identity order
    pub customer_modifications: Vec<CustomerModification>,
    /// Edges removed to break dependency cycles
    pub broken_edges: Vec<BrokenEdge>,
    /// Counts
    pub summary: SessionSummary,
}

impl SessionReport {
    /// Entry for `object_id`, if it is in the working set
    #[must_use]
    pub fn change(&self, object_id: ObjectId) -> Option<&OrderedChange> {
        self.changes.iter().find(|c| c.object_id == object_id)
    }

    /// Entries with one classification, in display order
    pub fn by_classification(
        &self,
        classification: Classification,
    ) -> impl Iterator<Item = &OrderedChange> {
        self.changes
            .iter()
            .filter(move |c| c.classification == classification)
    }

    /// Render as pretty JSON
    ///
    /// # Errors
    /// Returns [`MergeError::Report`] if serialization fails.
    pub fn to_json(&self) -> Result<String, MergeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Session-scoped pipeline
///
/// Owns its registry; sessions never share one.
#[derive(Debug)]
pub struct MergeSession {
    config: MergeConfig,
    registry: ObjectRegistry,
    comparator: Comparator,
    guidance: GuidanceGenerator,
}

impl MergeSession {
    /// Create a session with an empty registry
    ///
    /// # Errors
    /// Returns [`MergeError::Config`] if the configuration is invalid.
    pub fn new(config: MergeConfig) -> Result<Self, MergeError> {
        Self::with_registry(config, ObjectRegistry::new())
    }

    /// Create a session over an already populated registry
    ///
    /// # Errors
    /// Returns [`MergeError::Config`] if the configuration is invalid.
    pub fn with_registry(config: MergeConfig, registry: ObjectRegistry) -> Result<Self, MergeError> {
        config.validate()?;
        Ok(Self {
            comparator: Comparator::from_options(&config.comparison),
            guidance: GuidanceGenerator::new(config.guidance, &config.comparison),
            config,
            registry,
        })
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Session registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ObjectRegistry {
        &self.registry
    }

    /// Load the three extracted packages
    ///
    /// # Errors
    /// Returns [`MergeError::Registry`] on a duplicate version; the session
    /// should then be discarded.
    pub fn ingest(
        &self,
        base: Vec<ExtractedObject>,
        customer: Vec<ExtractedObject>,
        new_vendor: Vec<ExtractedObject>,
    ) -> Result<IngestStats, MergeError> {
        Ok(ingest_packages(&self.registry, base, customer, new_vendor)?)
    }

    /// Run the full pipeline over the registry contents
    ///
    /// # Errors
    /// Returns [`MergeError::Classification`] if the classification table
    /// cannot be applied. Comparison problems and dependency cycles never
    /// fail the run.
    pub fn run(&self) -> Result<SessionReport, MergeError> {
        let session_id = SessionId::new();
        let span = tracing::info_span!("merge_session", %session_id);
        let _enter = span.enter();

        let deltas = compute_delta(&self.registry, &self.comparator);
        tracing::info!(delta = deltas.len(), "vendor delta computed");

        let customers = compare_customer(&self.registry, &self.comparator, &deltas);
        let customer_modified = customers.values().filter(|c| c.customer_modified).count();
        tracing::info!(customer_modified, "customer comparison complete");

        let classified = classify_all(&deltas, &customers).map_err(|e| {
            tracing::error!(error = %e, "classification failed");
            e
        })?;

        let ordering = order_changes(classified, &self.registry, &self.config.ordering);

        let changes: Vec<OrderedChange> = ordering
            .changes
            .into_iter()
            .enumerate()
            .map(|(position, change)| {
                let guidance = self
                    .guidance
                    .generate(&change, &self.registry.versions(change.object_id));
                OrderedChange {
                    object_id: change.object_id,
                    classification: change.classification,
                    vendor_change_type: change.vendor_change_type,
                    customer_change_type: change.customer_change_type,
                    display_order: change.display_order.unwrap_or(position),
                    guidance,
                }
            })
            .collect();

        let deltas: Vec<DeltaResult> = deltas.into_values().collect();
        let customer_modifications: Vec<CustomerModification> = customers.into_values().collect();

        let mut summary = SessionSummary {
            total: changes.len(),
            caveats: deltas.iter().filter(|d| d.caveat.is_some()).count()
                + customer_modifications
                    .iter()
                    .filter(|c| c.caveat.is_some())
                    .count(),
            with_guidance: changes.iter().filter(|c| c.guidance.is_some()).count(),
            broken_edges: ordering.broken_edges.len(),
            ordering_truncated: ordering.truncated,
            ..SessionSummary::default()
        };
        for change in &changes {
            match change.classification {
                Classification::NoConflict => summary.no_conflict += 1,
                Classification::Conflict => summary.conflict += 1,
                Classification::New => summary.new += 1,
                Classification::Deleted => summary.deleted += 1,
            }
        }

        tracing::info!(
            total = summary.total,
            no_conflict = summary.no_conflict,
            conflict = summary.conflict,
            new = summary.new,
            deleted = summary.deleted,
            caveats = summary.caveats,
            broken_edges = summary.broken_edges,
            "merge session complete"
        );

        Ok(SessionReport {
            session_id,
            created_at: Utc::now(),
            changes,
            deltas,
            customer_modifications,
            broken_edges: ordering.broken_edges,
            summary,
        })
    }
}

/// Ingest three packages into a fresh session and run it
///
/// # Errors
/// Any [`MergeError`] from configuration, ingestion or classification.
pub fn run_session(
    config: MergeConfig,
    base: Vec<ExtractedObject>,
    customer: Vec<ExtractedObject>,
    new_vendor: Vec<ExtractedObject>,
) -> Result<SessionReport, MergeError> {
    let session = MergeSession::new(config)?;
    session.ingest(base, customer, new_vendor)?;
    session.run()
}
