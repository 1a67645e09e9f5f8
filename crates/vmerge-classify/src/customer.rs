//! Customer comparison (Base -> Customer)
//!
//! Answers whether the customer independently touched each delta object.
//! Never looks at the NewVendor package.

use crate::types::{CustomerModification, DeltaResult};
use std::collections::BTreeMap;
use vmerge_compare::Comparator;
use vmerge_object::{ObjectId, ObjectRegistry};

/// Build one [`CustomerModification`] per delta object
#[must_use]
pub fn compare_customer(
    registry: &ObjectRegistry,
    comparator: &Comparator,
    deltas: &BTreeMap<ObjectId, DeltaResult>,
) -> BTreeMap<ObjectId, CustomerModification> {
    deltas
        .keys()
        .map(|&id| {
            let versions = registry.versions(id);
            let mut record = CustomerModification {
                object_id: id,
                exists_in_customer: versions.customer.is_some(),
                customer_modified: false,
                exists_in_base: versions.base.is_some(),
                caveat: None,
            };

            match (&versions.base, &versions.customer) {
                // No base to compare against: any customer copy counts as a change
                (None, Some(_)) => record.customer_modified = true,
                (Some(base), Some(customer)) => {
                    let outcome = comparator.compare(base, customer);
                    if let Some(caveat) = &outcome.caveat {
                        let uuid = registry.identity(id).map(|i| i.external_uuid).unwrap_or_default();
                        tracing::warn!(%uuid, %caveat, "customer comparison degraded");
                    }
                    record.customer_modified = outcome.changed();
                    record.caveat = outcome.caveat;
                }
                (_, None) => {}
            }
            (id, record)
        })
        .collect()
}
