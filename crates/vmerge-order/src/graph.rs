//! Dependency graph over the working set
//!
//! Nodes are working-set identities held in a petgraph arena (stable
//! integer indices, no pointers). An edge runs from the depended-upon
//! parent to the referencing child, so a topological order lists parents
//! first.

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{depth_first_search, Control, DfsEvent};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap};
use vmerge_object::{DependencyKind, ObjectId, ObjectIdentity, ObjectRegistry, ObjectType};

/// Structural reference between two working-set objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Depended-upon object
    pub parent: ObjectId,
    /// Referencing object
    pub child: ObjectId,
    /// Reference kind
    pub kind: DependencyKind,
}

/// Edge removed to break a dependency cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokenEdge {
    /// The removed edge
    pub edge: DependencyEdge,
    /// External uuid of the parent
    pub parent_uuid: String,
    /// External uuid of the child
    pub child_uuid: String,
}

/// Deterministic secondary order: type, then name, then uuid
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    /// Object category
    pub object_type: ObjectType,
    /// Display name
    pub name: String,
    /// External uuid
    pub uuid: String,
}

impl From<&ObjectIdentity> for SortKey {
    fn from(identity: &ObjectIdentity) -> Self {
        Self {
            object_type: identity.object_type.clone(),
            name: identity.name.clone(),
            uuid: identity.external_uuid.clone(),
        }
    }
}

#[derive(Debug, Clone)]
struct GraphNode {
    object_id: ObjectId,
    key: SortKey,
}

/// Parent -> child reference graph restricted to the working set
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: StableDiGraph<GraphNode, DependencyKind>,
    index: HashMap<ObjectId, NodeIndex>,
}

impl DependencyGraph {
    /// Build the graph for `members`
    ///
    /// Edges whose endpoints are not both members are dropped; so are self
    /// references and duplicate `(parent, child)` pairs.
    #[must_use]
    pub fn build<I>(members: BTreeMap<ObjectId, SortKey>, edges: I) -> Self
    where
        I: IntoIterator<Item = DependencyEdge>,
    {
        let mut nodes: Vec<(ObjectId, SortKey)> = members.into_iter().collect();
        nodes.sort_by(|a, b| a.1.cmp(&b.1));

        let mut graph = StableDiGraph::with_capacity(nodes.len(), 0);
        let mut index = HashMap::with_capacity(nodes.len());
        for (object_id, key) in nodes {
            let ix = graph.add_node(GraphNode { object_id, key });
            index.insert(object_id, ix);
        }

        let mut kept: BTreeMap<(NodeIndex, NodeIndex), DependencyKind> = BTreeMap::new();
        for edge in edges {
            if edge.parent == edge.child {
                tracing::trace!(object = %edge.child, "dropping self reference");
                continue;
            }
            let (Some(&p), Some(&c)) = (index.get(&edge.parent), index.get(&edge.child)) else {
                tracing::trace!(parent = %edge.parent, child = %edge.child, "dropping edge outside working set");
                continue;
            };
            kept.entry((p, c))
                .and_modify(|kind| *kind = (*kind).min(edge.kind))
                .or_insert(edge.kind);
        }
        for ((p, c), kind) in kept {
            graph.add_edge(p, c, kind);
        }

        Self { graph, index }
    }

    /// Build the graph for `members`, reading references from every
    /// Base, Customer and NewVendor version of each member
    ///
    /// References to unknown uuids are treated as no ordering constraint.
    #[must_use]
    pub fn from_registry(registry: &ObjectRegistry, members: &BTreeSet<ObjectId>) -> Self {
        let mut keys = BTreeMap::new();
        let mut edges = Vec::new();

        for &child in members {
            let Some(identity) = registry.identity(child) else {
                continue;
            };
            keys.insert(child, SortKey::from(&identity));

            for version in registry.versions(child).iter() {
                for dependency in &version.dependencies {
                    match registry.lookup(&dependency.target_uuid) {
                        Some(parent) => edges.push(DependencyEdge {
                            parent,
                            child,
                            kind: dependency.kind,
                        }),
                        None => tracing::debug!(
                            child = %identity.external_uuid,
                            target = %dependency.target_uuid,
                            "reference to unknown object ignored"
                        ),
                    }
                }
            }
        }

        Self::build(keys, edges)
    }

    /// Number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether `parent -> child` is present
    #[must_use]
    pub fn has_edge(&self, parent: ObjectId, child: ObjectId) -> bool {
        match (self.index.get(&parent), self.index.get(&child)) {
            (Some(&p), Some(&c)) => self.graph.find_edge(p, c).is_some(),
            _ => false,
        }
    }

    /// All edges in `(parent, child)` order
    #[must_use]
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut edges: Vec<DependencyEdge> = self
            .graph
            .edge_indices()
            .filter_map(|e| {
                let (p, c) = self.graph.edge_endpoints(e)?;
                Some(DependencyEdge {
                    parent: self.graph[p].object_id,
                    child: self.graph[c].object_id,
                    kind: self.graph[e],
                })
            })
            .collect();
        edges.sort();
        edges
    }

    /// One cycle as a list of `(parent, child)` node pairs, if any exists
    fn find_cycle(&self) -> Option<Vec<(NodeIndex, NodeIndex)>> {
        let mut tree_parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let back_edge = depth_first_search(&self.graph, self.graph.node_indices(), |event| {
            match event {
                DfsEvent::TreeEdge(u, v) => {
                    tree_parent.insert(v, u);
                }
                DfsEvent::BackEdge(u, v) => return Control::Break((u, v)),
                _ => {}
            }
            Control::Continue
        })
        .break_value()?;

        // Back edge u -> v closes the tree path v -> ... -> u
        let (u, v) = back_edge;
        let mut cycle = vec![(u, v)];
        let mut cursor = u;
        while cursor != v {
            let parent = *tree_parent.get(&cursor)?;
            cycle.push((parent, cursor));
            cursor = parent;
        }
        Some(cycle)
    }

    /// Remove edges until the graph is acyclic or `max_breaks` is reached
    ///
    /// Each round finds one cycle and drops its edge with the alphabetically
    /// largest child uuid (parent uuid breaks ties), then searches again
    /// from scratch. Returns the removed edges in removal order and whether
    /// the graph is now acyclic.
    pub fn break_cycles(&mut self, max_breaks: usize) -> (Vec<BrokenEdge>, bool) {
        let mut broken = Vec::new();

        loop {
            let Some(cycle) = self.find_cycle() else {
                return (broken, true);
            };
            if broken.len() >= max_breaks {
                tracing::warn!(max_breaks, "cycle break limit reached; ordering is best effort");
                return (broken, false);
            }

            let Some(&(p, c)) = cycle.iter().max_by(|a, b| {
                let ka = (&self.graph[a.1].key.uuid, &self.graph[a.0].key.uuid);
                let kb = (&self.graph[b.1].key.uuid, &self.graph[b.0].key.uuid);
                ka.cmp(&kb)
            }) else {
                return (broken, false);
            };
            let Some(edge_ix) = self.graph.find_edge(p, c) else {
                return (broken, false);
            };
            let kind = self.graph.remove_edge(edge_ix).unwrap_or_default();

            let record = BrokenEdge {
                edge: DependencyEdge {
                    parent: self.graph[p].object_id,
                    child: self.graph[c].object_id,
                    kind,
                },
                parent_uuid: self.graph[p].key.uuid.clone(),
                child_uuid: self.graph[c].key.uuid.clone(),
            };
            tracing::warn!(
                parent = %record.parent_uuid,
                child = %record.child_uuid,
                cycle_len = cycle.len(),
                "broke dependency cycle"
            );
            broken.push(record);
        }
    }

    /// Topological order with the [`SortKey`] as tiebreak
    ///
    /// Parents always precede their children. Nodes still caught in a cycle
    /// (only possible after an exhausted [`break_cycles`](Self::break_cycles))
    /// are appended in key order.
    #[must_use]
    pub fn topological_order(&self) -> Vec<ObjectId> {
        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|n| (n, self.graph.neighbors_directed(n, Direction::Incoming).count()))
            .collect();

        let mut ready: BinaryHeap<Reverse<(&SortKey, NodeIndex)>> = in_degree
            .iter()
            .filter(|(_, deg)| **deg == 0)
            .map(|(&n, _)| Reverse((&self.graph[n].key, n)))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        let mut emitted = BTreeSet::new();
        while let Some(Reverse((_, n))) = ready.pop() {
            order.push(self.graph[n].object_id);
            emitted.insert(n);
            for child in self.graph.neighbors_directed(n, Direction::Outgoing) {
                if let Some(deg) = in_degree.get_mut(&child) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.push(Reverse((&self.graph[child].key, child)));
                    }
                }
            }
        }

        if order.len() < self.graph.node_count() {
            let mut rest: Vec<NodeIndex> = self
                .graph
                .node_indices()
                .filter(|n| !emitted.contains(n))
                .collect();
            rest.sort_by(|a, b| self.graph[*a].key.cmp(&self.graph[*b].key));
            order.extend(rest.into_iter().map(|n| self.graph[n].object_id));
        }
        order
    }
}
