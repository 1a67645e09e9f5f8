//! Review ordering
//!
//! Assigns the dense, zero-based `display_order` across three buckets:
//!
//! 1. NoConflict and New, grouped by object type then name
//! 2. Conflict, in dependency order (parents before children)
//! 3. Deleted, grouped by object type then name
//!
//! The dependency graph spans the whole working set so that constraints
//! passing through non-conflict objects still order the conflict bucket.

use crate::graph::{BrokenEdge, DependencyGraph, SortKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use vmerge_classify::{Classification, ClassifiedChange};
use vmerge_object::{ObjectId, ObjectRegistry};

/// Ordering settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingOptions {
    /// Ceiling on cycle-breaking rounds
    pub max_cycle_breaks: usize,
}

impl Default for OrderingOptions {
    fn default() -> Self {
        Self {
            max_cycle_breaks: 10_000,
        }
    }
}

/// Review bucket, in display priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    /// NoConflict and New changes
    NoConflict,
    /// Conflicting changes
    Conflict,
    /// Vendor changes to customer-deleted objects
    Deleted,
}

impl From<Classification> for Bucket {
    fn from(classification: Classification) -> Self {
        match classification {
            Classification::NoConflict | Classification::New => Self::NoConflict,
            Classification::Conflict => Self::Conflict,
            Classification::Deleted => Self::Deleted,
        }
    }
}

/// Ordered working set plus what the graph had to give up
#[derive(Debug, Clone, Default)]
pub struct OrderingOutcome {
    /// Changes in display order, `display_order` set on each
    pub changes: Vec<ClassifiedChange>,
    /// Edges removed to break cycles
    pub broken_edges: Vec<BrokenEdge>,
    /// Cycle breaking hit its ceiling and the conflict order is best effort
    pub truncated: bool,
    /// Edges left in the graph after cycle breaking
    pub dependency_edges: usize,
}

/// Order a classified working set for review
///
/// Runs to completion; a dependency cycle is never an error.
#[must_use]
pub fn order_changes(
    changes: Vec<ClassifiedChange>,
    registry: &ObjectRegistry,
    options: &OrderingOptions,
) -> OrderingOutcome {
    let members: BTreeSet<ObjectId> = changes.iter().map(|c| c.object_id).collect();
    let mut graph = DependencyGraph::from_registry(registry, &members);
    let (broken_edges, acyclic) = graph.break_cycles(options.max_cycle_breaks);

    let rank: HashMap<ObjectId, usize> = graph
        .topological_order()
        .into_iter()
        .enumerate()
        .map(|(position, id)| (id, position))
        .collect();

    let keys: HashMap<ObjectId, SortKey> = members
        .iter()
        .filter_map(|&id| registry.identity(id).map(|identity| (id, SortKey::from(&identity))))
        .collect();

    let mut no_conflict = Vec::new();
    let mut conflict = Vec::new();
    let mut deleted = Vec::new();
    for change in changes {
        match Bucket::from(change.classification) {
            Bucket::NoConflict => no_conflict.push(change),
            Bucket::Conflict => conflict.push(change),
            Bucket::Deleted => deleted.push(change),
        }
    }

    let by_key = |a: &ClassifiedChange, b: &ClassifiedChange| {
        keys.get(&a.object_id)
            .cmp(&keys.get(&b.object_id))
            .then(a.object_id.cmp(&b.object_id))
    };
    no_conflict.sort_by(by_key);
    deleted.sort_by(by_key);
    conflict.sort_by_key(|c| (rank.get(&c.object_id).copied().unwrap_or(usize::MAX), c.object_id));

    let changes: Vec<ClassifiedChange> = no_conflict
        .into_iter()
        .chain(conflict)
        .chain(deleted)
        .enumerate()
        .map(|(order, change)| change.with_display_order(order))
        .collect();

    tracing::debug!(
        changes = changes.len(),
        edges = graph.edge_count(),
        broken = broken_edges.len(),
        "ordered working set"
    );

    OrderingOutcome {
        changes,
        broken_edges,
        truncated: !acyclic,
        dependency_edges: graph.edge_count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmerge_classify::ChangeType;
    use vmerge_object::{DependencyRef, ExtractedObject, ObjectType, PackageRole};

    fn add(
        registry: &ObjectRegistry,
        uuid: &str,
        name: &str,
        object_type: ObjectType,
        deps: &[&str],
    ) -> ObjectId {
        let mut obj = ExtractedObject::new(uuid, name, object_type);
        for dep in deps {
            obj = obj.with_dependency(DependencyRef::to(*dep));
        }
        registry.register(PackageRole::NewVendor, obj).unwrap()
    }

    fn change(id: ObjectId, classification: Classification) -> ClassifiedChange {
        ClassifiedChange {
            object_id: id,
            classification,
            vendor_change_type: ChangeType::Modified,
            customer_change_type: None,
            display_order: None,
        }
    }

    fn order_of(outcome: &OrderingOutcome, id: ObjectId) -> usize {
        outcome
            .changes
            .iter()
            .find(|c| c.object_id == id)
            .and_then(|c| c.display_order)
            .unwrap()
    }

    #[test]
    fn buckets_are_in_priority_order() {
        let registry = ObjectRegistry::new();
        let d = add(&registry, "d", "Deleted", ObjectType::Constant, &[]);
        let c = add(&registry, "c", "Conflict", ObjectType::Constant, &[]);
        let n = add(&registry, "n", "New", ObjectType::ProcessModel, &[]);
        let ok = add(&registry, "ok", "Fine", ObjectType::Interface, &[]);

        let outcome = order_changes(
            vec![
                change(d, Classification::Deleted),
                change(c, Classification::Conflict),
                change(n, Classification::New),
                change(ok, Classification::NoConflict),
            ],
            &registry,
            &OrderingOptions::default(),
        );

        let orders: Vec<usize> = outcome.changes.iter().filter_map(|c| c.display_order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
        assert_eq!(order_of(&outcome, ok), 0);
        assert_eq!(order_of(&outcome, n), 1);
        assert_eq!(order_of(&outcome, c), 2);
        assert_eq!(order_of(&outcome, d), 3);
    }

    #[test]
    fn no_conflict_bucket_groups_by_type_then_name() {
        let registry = ObjectRegistry::new();
        let pm = add(&registry, "1", "Approve", ObjectType::ProcessModel, &[]);
        let i2 = add(&registry, "2", "Zeta", ObjectType::Interface, &[]);
        let i1 = add(&registry, "3", "Alpha", ObjectType::Interface, &[]);

        let outcome = order_changes(
            vec![
                change(pm, Classification::NoConflict),
                change(i2, Classification::NoConflict),
                change(i1, Classification::NoConflict),
            ],
            &registry,
            &OrderingOptions::default(),
        );
        let ids: Vec<ObjectId> = outcome.changes.iter().map(|c| c.object_id).collect();
        assert_eq!(ids, vec![i1, i2, pm]);
    }

    #[test]
    fn conflict_bucket_respects_dependencies() {
        let registry = ObjectRegistry::new();
        // Names sort the child first; the dependency must win
        let child = add(&registry, "pm", "A Flow", ObjectType::Cdt, &["if"]);
        let parent = add(&registry, "if", "Z Form", ObjectType::Cdt, &[]);

        let outcome = order_changes(
            vec![change(child, Classification::Conflict), change(parent, Classification::Conflict)],
            &registry,
            &OrderingOptions::default(),
        );
        assert!(order_of(&outcome, parent) < order_of(&outcome, child));
        assert_eq!(outcome.dependency_edges, 1);
    }

    #[test]
    fn references_outside_working_set_add_no_edges() {
        let registry = ObjectRegistry::new();
        // Registered but unchanged, so never part of the working set
        add(&registry, "steady", "A Steady", ObjectType::Cdt, &[]);
        let flow = add(&registry, "flow", "Z Flow", ObjectType::Cdt, &["ghost", "steady"]);
        let form = add(&registry, "form", "M Form", ObjectType::Cdt, &[]);
        let tidy = add(&registry, "tidy", "Tidy", ObjectType::Constant, &["ghost"]);

        let outcome = order_changes(
            vec![
                change(flow, Classification::Conflict),
                change(form, Classification::Conflict),
                change(tidy, Classification::NoConflict),
            ],
            &registry,
            &OrderingOptions::default(),
        );

        assert_eq!(outcome.dependency_edges, 0);
        assert!(outcome.broken_edges.is_empty());
        assert!(!outcome.truncated);
        assert_eq!(outcome.changes.len(), 3);
        assert_eq!(order_of(&outcome, tidy), 0);
        assert_eq!(order_of(&outcome, form), 1);
        assert_eq!(order_of(&outcome, flow), 2);
    }

    #[test]
    fn conflict_cycle_is_broken_and_reported() {
        let registry = ObjectRegistry::new();
        let a = add(&registry, "a", "A", ObjectType::ExpressionRule, &["b"]);
        let b = add(&registry, "b", "B", ObjectType::ExpressionRule, &["a"]);

        let outcome = order_changes(
            vec![change(a, Classification::Conflict), change(b, Classification::Conflict)],
            &registry,
            &OrderingOptions::default(),
        );
        assert_eq!(outcome.broken_edges.len(), 1);
        assert!(!outcome.truncated);
        assert_eq!(outcome.changes.len(), 2);
    }
}
