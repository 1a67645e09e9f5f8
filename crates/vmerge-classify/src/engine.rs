//! Classification engine
//!
//! A pure decision table keyed on
//! `(delta category, exists in customer, customer modified)`:
//!
//! | category   | exists | modified | classification |
//! |------------|--------|----------|----------------|
//! | New        | any    | any      | New            |
//! | Modified   | false  | false    | Deleted        |
//! | Modified   | true   | false    | NoConflict     |
//! | Modified   | true   | true     | Conflict       |
//! | Deprecated | false  | false    | NoConflict     |
//! | Deprecated | true   | false    | NoConflict     |
//! | Deprecated | true   | true     | Conflict       |
//!
//! `modified = true` with `exists = false` cannot come out of the customer
//! comparison; meeting it means an upstream defect and fails the session.

use crate::types::{Classification, ClassifiedChange, CustomerModification, DeltaCategory, DeltaResult};
use std::collections::BTreeMap;
use vmerge_object::ObjectId;

/// Look up the table row for one triple
///
/// Returns `None` only for the inconsistent `exists = false, modified = true`
/// input on vendor-modified or vendor-removed objects.
#[must_use]
pub fn rule(
    category: DeltaCategory,
    exists_in_customer: bool,
    customer_modified: bool,
) -> Option<Classification> {
    use Classification as C;
    use DeltaCategory as D;

    match (category, exists_in_customer, customer_modified) {
        (D::New, _, _) => Some(C::New),
        (D::Modified, false, false) => Some(C::Deleted),
        (D::Modified, true, false) => Some(C::NoConflict),
        (D::Modified, true, true) => Some(C::Conflict),
        (D::Deprecated, false, false) | (D::Deprecated, true, false) => Some(C::NoConflict),
        (D::Deprecated, true, true) => Some(C::Conflict),
        (D::Modified | D::Deprecated, false, true) => None,
    }
}

/// Classify one delta object
///
/// # Errors
/// - [`ClassificationError::IdentityMismatch`] if the two records describe
///   different objects
/// - [`ClassificationError::Exhaustiveness`] if the table has no row for
///   the triple
pub fn classify(
    delta: &DeltaResult,
    customer: &CustomerModification,
) -> Result<ClassifiedChange, ClassificationError> {
    if delta.object_id != customer.object_id {
        return Err(ClassificationError::IdentityMismatch {
            delta: delta.object_id,
            customer: customer.object_id,
        });
    }

    let classification = rule(
        delta.category,
        customer.exists_in_customer,
        customer.customer_modified,
    )
    .ok_or(ClassificationError::Exhaustiveness {
        object_id: delta.object_id,
        category: delta.category,
        exists_in_customer: customer.exists_in_customer,
        customer_modified: customer.customer_modified,
    })?;

    Ok(ClassifiedChange {
        object_id: delta.object_id,
        classification,
        vendor_change_type: delta.vendor_change_type(),
        customer_change_type: customer.customer_change_type(),
        display_order: None,
    })
}

/// Classify every delta object; exactly one change per delta entry
///
/// # Errors
/// Fails on the first object without a customer record or without a
/// table row. A partial classification is never returned.
pub fn classify_all(
    deltas: &BTreeMap<ObjectId, DeltaResult>,
    customers: &BTreeMap<ObjectId, CustomerModification>,
) -> Result<Vec<ClassifiedChange>, ClassificationError> {
    let changes = deltas
        .values()
        .map(|delta| {
            let customer = customers
                .get(&delta.object_id)
                .ok_or(ClassificationError::MissingCustomerRecord {
                    object_id: delta.object_id,
                })?;
            classify(delta, customer)
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(classified = changes.len(), "classified working set");
    Ok(changes)
}

/// Classification faults. These indicate code defects, not data problems.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    /// No table row for the input triple
    #[error("no classification rule for {category:?} (exists_in_customer={exists_in_customer}, customer_modified={customer_modified}) on {object_id}")]
    Exhaustiveness {
        /// Object being classified
        object_id: ObjectId,
        /// Delta category
        category: DeltaCategory,
        /// Customer presence flag
        exists_in_customer: bool,
        /// Customer modification flag
        customer_modified: bool,
    },

    /// Delta object has no customer comparison
    #[error("no customer comparison for delta object {object_id}")]
    MissingCustomerRecord {
        /// Object being classified
        object_id: ObjectId,
    },

    /// Delta and customer records disagree on identity
    #[error("delta record {delta} paired with customer record {customer}")]
    IdentityMismatch {
        /// Id on the delta record
        delta: ObjectId,
        /// Id on the customer record
        customer: ObjectId,
    },
}
