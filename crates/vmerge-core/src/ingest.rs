//! Package ingestion
//!
//! Loads the three extracted packages into a registry. Identities are
//! seeded sequentially in package order so ids are reproducible; version
//! writes then run in parallel, one rayon task per package. Each package
//! writes only its own role slot.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use vmerge_object::{ExtractedObject, ObjectRegistry, PackageRole, RegistryError};

/// Objects loaded per package
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Base (A) versions
    pub base: usize,
    /// Customer (B) versions
    pub customer: usize,
    /// NewVendor (C) versions
    pub new_vendor: usize,
    /// Distinct identities in the registry afterwards
    pub identities: usize,
}

/// Register the extracted contents of all three packages
///
/// # Errors
/// Returns the first [`RegistryError::DuplicateVersion`] hit by any
/// package. Versions written before the failure stay in the registry; the
/// caller is expected to discard it.
pub fn ingest_packages(
    registry: &ObjectRegistry,
    base: Vec<ExtractedObject>,
    customer: Vec<ExtractedObject>,
    new_vendor: Vec<ExtractedObject>,
) -> Result<IngestStats, RegistryError> {
    for object in base.iter().chain(&customer).chain(&new_vendor) {
        registry.find_or_create(&object.uuid, &object.name, object.object_type.clone());
    }

    let packages = vec![
        (PackageRole::Base, base),
        (PackageRole::Customer, customer),
        (PackageRole::NewVendor, new_vendor),
    ];
    let counts = packages
        .into_par_iter()
        .map(|(role, objects)| ingest_package(registry, role, objects))
        .collect::<Result<Vec<(PackageRole, usize)>, RegistryError>>()?;

    let mut stats = IngestStats {
        identities: registry.len(),
        ..IngestStats::default()
    };
    for (role, count) in counts {
        match role {
            PackageRole::Base => stats.base = count,
            PackageRole::Customer => stats.customer = count,
            PackageRole::NewVendor => stats.new_vendor = count,
        }
    }

    tracing::info!(
        base = stats.base,
        customer = stats.customer,
        new_vendor = stats.new_vendor,
        identities = stats.identities,
        "ingested packages"
    );
    Ok(stats)
}

fn ingest_package(
    registry: &ObjectRegistry,
    role: PackageRole,
    objects: Vec<ExtractedObject>,
) -> Result<(PackageRole, usize), RegistryError> {
    let count = objects.len();
    for object in objects {
        registry.register(role, object).map_err(|e| {
            tracing::error!(%role, error = %e, "package extraction rejected");
            e
        })?;
    }
    tracing::debug!(%role, count, "package registered");
    Ok((role, count))
}
