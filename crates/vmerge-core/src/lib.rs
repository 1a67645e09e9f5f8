//! Vendor Merge Core
//!
//! Three-way comparison of an original vendor package (Base), the
//! customer's customized copy (Customer) and a new vendor release
//! (NewVendor). Produces a classified, dependency-ordered working set of
//! the objects the vendor touched, with merge guidance.
//!
//! # Example
//!
//! ```rust
//! use vmerge_core::{run_session, MergeConfig};
//! use vmerge_object::{ExtractedObject, ObjectType, StructuralDetail};
//!
//! let rule = |body: &str| {
//!     ExtractedObject::new("rule-1", "Calc Total", ObjectType::ExpressionRule)
//!         .with_detail(StructuralDetail::new().with_section("expression", body))
//! };
//!
//! let report = run_session(
//!     MergeConfig::default(),
//!     vec![rule("v1")],
//!     vec![rule("v1-custom")],
//!     vec![rule("v2")],
//! )
//! .unwrap();
//!
//! assert_eq!(report.summary.conflict, 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod error;
mod ingest;
mod session;

pub use config::{ConfigError, MergeConfig};
pub use error::MergeError;
pub use ingest::{ingest_packages, IngestStats};
pub use session::{
    run_session, MergeSession, OrderedChange, SessionId, SessionReport, SessionSummary,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
