//! Session-level properties over random three-way packages

use proptest::prelude::*;
use std::collections::BTreeSet;
use vmerge_classify::{rule, Classification};
use vmerge_core::{run_session, MergeConfig};
use vmerge_test_utils::PackageBuilder;

/// Presence and content variant of one object in one package
type Side = Option<u8>;

fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(None), (0u8..3).prop_map(Some)]
}

fn packages(objects: &[(Side, Side, Side)]) -> [PackageBuilder; 3] {
    let mut out = [PackageBuilder::new(), PackageBuilder::new(), PackageBuilder::new()];
    for (i, sides) in objects.iter().enumerate() {
        let uuid = format!("obj-{i:03}");
        let name = format!("Object {i}");
        for (slot, variant) in [sides.0, sides.1, sides.2].into_iter().enumerate() {
            if let Some(v) = variant {
                out[slot] = std::mem::take(&mut out[slot]).rule(&uuid, &name, &format!("body {v}"));
            }
        }
    }
    out
}

proptest! {
    #[test]
    fn prop_working_set_is_exactly_the_vendor_delta(
        objects in proptest::collection::vec((side(), side(), side()), 0..40)
    ) {
        let [base, customer, vendor] = packages(&objects);
        let report = run_session(MergeConfig::default(), base.build(), customer.build(), vendor.build()).unwrap();

        let expected: usize = objects
            .iter()
            .filter(|(a, _, c)| match (a, c) {
                (None, None) => false,
                (Some(a), Some(c)) => a != c,
                _ => true,
            })
            .count();

        prop_assert_eq!(report.deltas.len(), expected);
        prop_assert_eq!(report.changes.len(), expected);
        prop_assert_eq!(report.customer_modifications.len(), expected);

        let ids: BTreeSet<_> = report.changes.iter().map(|c| c.object_id).collect();
        prop_assert_eq!(ids.len(), expected);

        let mut orders: Vec<usize> = report.changes.iter().map(|c| c.display_order).collect();
        orders.sort_unstable();
        prop_assert_eq!(orders, (0..expected).collect::<Vec<_>>());
    }

    #[test]
    fn prop_classification_matches_table(
        objects in proptest::collection::vec((side(), side(), side()), 1..30)
    ) {
        let [base, customer, vendor] = packages(&objects);
        let report = run_session(MergeConfig::default(), base.build(), customer.build(), vendor.build()).unwrap();

        for (delta, customer) in report.deltas.iter().zip(&report.customer_modifications) {
            prop_assert_eq!(delta.object_id, customer.object_id);
            let change = report.change(delta.object_id).unwrap();
            prop_assert_eq!(
                Some(change.classification),
                rule(delta.category, customer.exists_in_customer, customer.customer_modified)
            );
            prop_assert!(Classification::ALL.contains(&change.classification));
        }
    }

    #[test]
    fn prop_buckets_appear_in_priority_order(
        objects in proptest::collection::vec((side(), side(), side()), 1..30)
    ) {
        let [base, customer, vendor] = packages(&objects);
        let report = run_session(MergeConfig::default(), base.build(), customer.build(), vendor.build()).unwrap();

        let bucket = |c: Classification| match c {
            Classification::NoConflict | Classification::New => 0,
            Classification::Conflict => 1,
            Classification::Deleted => 2,
        };
        let buckets: Vec<u8> = report.changes.iter().map(|c| bucket(c.classification)).collect();
        let mut sorted = buckets.clone();
        sorted.sort_unstable();
        prop_assert_eq!(buckets, sorted);
    }
}
