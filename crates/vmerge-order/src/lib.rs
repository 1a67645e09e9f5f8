//! Vendor Merge Ordering
//!
//! Dependency-aware, deterministic review order for classified changes.
//!
//! # Core Concepts
//!
//! - [`DependencyGraph`]: Parent -> child references restricted to the working set
//! - [`DependencyGraph::break_cycles`]: Deterministic cycle breaking, one edge per cycle
//! - [`order_changes`]: Bucketed ordering with dense `display_order`
//!
//! # Example
//!
//! ```rust,ignore
//! use vmerge_order::{order_changes, OrderingOptions};
//!
//! let outcome = order_changes(classified, &registry, &OrderingOptions::default());
//! for broken in &outcome.broken_edges {
//!     println!("cycle broken at {} -> {}", broken.parent_uuid, broken.child_uuid);
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod graph;
mod ordering;

pub use graph::{BrokenEdge, DependencyEdge, DependencyGraph, SortKey};
pub use ordering::{order_changes, Bucket, OrderingOptions, OrderingOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
