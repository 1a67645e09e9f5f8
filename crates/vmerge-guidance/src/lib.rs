//! Vendor Merge Guidance
//!
//! Section-level reconciliation advice for classified changes.
//!
//! # Core Concepts
//!
//! - [`diff_sections`]: Base vs Customer and Base vs NewVendor, per section
//! - [`GuidanceGenerator`]: Picks a [`Recommendation`] and builds the reason
//! - [`MergeGuidance`]: Recommendation plus conflicting, added and modified sections
//!
//! # Example
//!
//! ```rust,ignore
//! use vmerge_guidance::GuidanceGenerator;
//!
//! let generator = GuidanceGenerator::default();
//! if let Some(guidance) = generator.generate(&change, &registry.versions(change.object_id)) {
//!     println!("{}: {}", guidance.recommendation, guidance.reason);
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod guidance;
mod sections;

pub use guidance::{GuidanceGenerator, GuidanceOptions, MergeGuidance, Recommendation};
pub use sections::{diff_sections, SectionChange, SectionDiff};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
