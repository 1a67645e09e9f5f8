//! Vendor Merge Comparison
//!
//! Pluggable equality predicates shared by the vendor-delta and customer
//! comparison phases.
//!
//! # Core Concepts
//!
//! - [`ComparisonStrategy`]: Core trait, `differs(before, after)`
//! - [`VersionTokenStrategy`]: Cheap version-marker pre-check
//! - [`ContentStrategy`]: Normalized structural-detail comparison
//! - [`Comparator`]: Runs both and records each verdict independently
//!
//! # Example
//!
//! ```rust,ignore
//! use vmerge_compare::{Comparator, ComparisonOptions};
//!
//! let comparator = Comparator::from_options(&ComparisonOptions::default());
//! let outcome = comparator.compare(&base_version, &vendor_version);
//! if outcome.changed() {
//!     // vendor touched this object
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod comparator;
mod content;
mod strategy;
mod version_token;

pub use comparator::{Comparator, ComparisonOptions, ComparisonOutcome};
pub use content::ContentStrategy;
pub use strategy::{ComparisonError, ComparisonStrategy, Verdict};
pub use version_token::VersionTokenStrategy;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
