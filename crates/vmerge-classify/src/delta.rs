//! Vendor delta (Base -> NewVendor)
//!
//! Only objects the vendor touched enter the working set. An object whose
//! Base and NewVendor versions compare equal under both strategies yields no
//! [`DeltaResult`] at all.

use crate::types::{DeltaCategory, DeltaResult};
use std::collections::BTreeMap;
use vmerge_compare::Comparator;
use vmerge_object::{ObjectId, ObjectRegistry};

/// Compute the vendor delta for every identity with a Base or NewVendor version
#[must_use]
pub fn compute_delta(
    registry: &ObjectRegistry,
    comparator: &Comparator,
) -> BTreeMap<ObjectId, DeltaResult> {
    let mut deltas = BTreeMap::new();

    for identity in registry.identities() {
        let versions = registry.versions(identity.id);
        let result = match (&versions.base, &versions.new_vendor) {
            (None, None) => continue,
            (None, Some(_)) => DeltaResult {
                object_id: identity.id,
                category: DeltaCategory::New,
                version_changed: true,
                content_changed: true,
                caveat: None,
            },
            (Some(_), None) => DeltaResult {
                object_id: identity.id,
                category: DeltaCategory::Deprecated,
                version_changed: true,
                content_changed: true,
                caveat: None,
            },
            (Some(base), Some(vendor)) => {
                let outcome = comparator.compare(base, vendor);
                if let Some(caveat) = &outcome.caveat {
                    tracing::warn!(uuid = %identity.external_uuid, %caveat, "vendor delta comparison degraded");
                }
                if !outcome.changed() {
                    continue;
                }
                DeltaResult {
                    object_id: identity.id,
                    category: DeltaCategory::Modified,
                    version_changed: outcome.version_changed,
                    content_changed: outcome.content_changed,
                    caveat: outcome.caveat,
                }
            }
        };
        deltas.insert(identity.id, result);
    }

    tracing::debug!(delta = deltas.len(), identities = registry.len(), "computed vendor delta");
    deltas
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmerge_object::{ExtractedObject, ObjectType, PackageRole, StructuralDetail};

    fn rule(uuid: &str, token: &str, body: &str) -> ExtractedObject {
        ExtractedObject::new(uuid, uuid, ObjectType::ExpressionRule)
            .with_version_token(token)
            .with_detail(StructuralDetail::new().with_section("definition", body))
    }

    #[test]
    fn categorizes_new_modified_deprecated() {
        let registry = ObjectRegistry::new();
        registry.register(PackageRole::NewVendor, rule("new", "v1", "1")).unwrap();
        registry.register(PackageRole::Base, rule("mod", "v1", "1")).unwrap();
        registry.register(PackageRole::NewVendor, rule("mod", "v2", "2")).unwrap();
        registry.register(PackageRole::Base, rule("gone", "v1", "1")).unwrap();

        let deltas = compute_delta(&registry, &Comparator::default());
        let category = |uuid: &str| deltas[&registry.lookup(uuid).unwrap()].category;

        assert_eq!(category("new"), DeltaCategory::New);
        assert_eq!(category("mod"), DeltaCategory::Modified);
        assert_eq!(category("gone"), DeltaCategory::Deprecated);
    }

    #[test]
    fn unchanged_objects_are_excluded() {
        let registry = ObjectRegistry::new();
        registry.register(PackageRole::Base, rule("same", "v1", "x  + 1")).unwrap();
        registry.register(PackageRole::NewVendor, rule("same", "v1", "x + 1")).unwrap();

        assert!(compute_delta(&registry, &Comparator::default()).is_empty());
    }

    #[test]
    fn customer_only_objects_are_excluded() {
        let registry = ObjectRegistry::new();
        registry.register(PackageRole::Customer, rule("local", "v1", "1")).unwrap();

        assert!(compute_delta(&registry, &Comparator::default()).is_empty());
    }

    #[test]
    fn token_only_change_is_modified() {
        let registry = ObjectRegistry::new();
        registry.register(PackageRole::Base, rule("resave", "v1", "1")).unwrap();
        registry.register(PackageRole::NewVendor, rule("resave", "v2", "1")).unwrap();

        let deltas = compute_delta(&registry, &Comparator::default());
        let delta = deltas.values().next().unwrap();
        assert!(delta.version_changed);
        assert!(!delta.content_changed);
    }
}
