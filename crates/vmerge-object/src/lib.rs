//! Vendor Merge Object Model
//!
//! Package-agnostic object identities with per-package version snapshots.
//!
//! # Core Concepts
//!
//! - [`ObjectIdentity`]: One logical object, keyed by external uuid
//! - [`ObjectVersion`]: Snapshot of an identity in one [`PackageRole`]
//! - [`StructuralDetail`]: Ordered section map consumed by comparison and guidance
//! - [`ContentFingerprint`]: 32-byte Blake3 digest of normalized content
//! - [`ObjectRegistry`]: Deduplicated catalogue, safe for concurrent extraction
//!
//! # Example
//!
//! ```rust
//! use vmerge_object::{ExtractedObject, ObjectRegistry, ObjectType, PackageRole};
//!
//! let registry = ObjectRegistry::new();
//! let base = ExtractedObject::new("9f1c", "Case Summary", ObjectType::Interface);
//! let vendor = ExtractedObject::new("9f1c", "Case Summary", ObjectType::Interface);
//!
//! let a = registry.register(PackageRole::Base, base).unwrap();
//! let c = registry.register(PackageRole::NewVendor, vendor).unwrap();
//! assert_eq!(a, c);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod fingerprint;
mod identity;
mod registry;
mod version;

pub use fingerprint::{ContentFingerprint, FingerprintError};
pub use identity::{ObjectId, ObjectIdentity, ObjectType, PackageRole};
pub use registry::{ObjectRegistry, RegistryError, VersionSet};
pub use version::{
    normalize_whitespace, DependencyKind, DependencyRef, ExtractedObject, ObjectVersion,
    StructuralDetail,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
