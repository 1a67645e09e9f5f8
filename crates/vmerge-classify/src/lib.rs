//! Vendor Merge Classification
//!
//! Delta-driven classification of vendor changes against customer edits.
//!
//! # Pipeline
//!
//! 1. [`compute_delta`]: Base vs NewVendor, one [`DeltaResult`] per touched object
//! 2. [`compare_customer`]: Base vs Customer for every delta object
//! 3. [`classify_all`]: Decision table, one [`ClassifiedChange`] per delta object
//!
//! Objects only the customer changed never enter the working set.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod customer;
mod delta;
mod engine;
mod types;

pub use customer::compare_customer;
pub use delta::compute_delta;
pub use engine::{classify, classify_all, rule, ClassificationError};
pub use types::{
    ChangeType, Classification, ClassifiedChange, CustomerModification, DeltaCategory,
    DeltaResult,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
