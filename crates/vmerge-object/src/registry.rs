//! Object identity registry
//!
//! Provides [`ObjectRegistry`], the deduplicated, package-agnostic catalogue
//! of identities plus their per-role version records.
//!
//! The registry is an arena of identities keyed by uuid, with versions held
//! in a map of maps `identity -> role -> version`. All state sits behind a
//! single mutex so the three package extractions may register objects
//! concurrently without ever creating two identities for one uuid.

use crate::identity::{ObjectId, ObjectIdentity, ObjectType, PackageRole};
use crate::version::{ExtractedObject, ObjectVersion};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Session-scoped catalogue of object identities and versions
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    /// Arena, indexed by `ObjectId`
    identities: Vec<ObjectIdentity>,

    /// uuid -> arena index
    by_uuid: HashMap<String, ObjectId>,

    /// identity -> role -> version
    versions: HashMap<ObjectId, HashMap<PackageRole, Arc<ObjectVersion>>>,
}

/// The three role slots of one identity
#[derive(Debug, Clone, Default)]
pub struct VersionSet {
    /// Version in the original vendor package (A)
    pub base: Option<Arc<ObjectVersion>>,
    /// Version in the customer package (B)
    pub customer: Option<Arc<ObjectVersion>>,
    /// Version in the new vendor package (C)
    pub new_vendor: Option<Arc<ObjectVersion>>,
}

impl VersionSet {
    /// Slot for `role`
    #[inline]
    #[must_use]
    pub fn get(&self, role: PackageRole) -> Option<&Arc<ObjectVersion>> {
        match role {
            PackageRole::Base => self.base.as_ref(),
            PackageRole::Customer => self.customer.as_ref(),
            PackageRole::NewVendor => self.new_vendor.as_ref(),
        }
    }

    /// Every present version
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ObjectVersion>> {
        [&self.base, &self.customer, &self.new_vendor]
            .into_iter()
            .filter_map(Option::as_ref)
    }
}

impl ObjectRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the identity for `uuid`, creating it on first sight
    ///
    /// Idempotent: later calls with the same uuid return the original
    /// identity unchanged, whatever name or type they pass.
    pub fn find_or_create(
        &self,
        uuid: &str,
        name: &str,
        object_type: ObjectType,
    ) -> ObjectIdentity {
        let mut inner = self.inner.lock();
        if let Some(id) = inner.by_uuid.get(uuid) {
            return inner.identities[id.index()].clone();
        }

        let id = ObjectId(u32::try_from(inner.identities.len()).unwrap_or(u32::MAX));
        let identity = ObjectIdentity {
            id,
            external_uuid: uuid.to_string(),
            name: name.to_string(),
            object_type,
        };
        inner.identities.push(identity.clone());
        inner.by_uuid.insert(uuid.to_string(), id);
        tracing::trace!(%id, uuid, "registered identity");
        identity
    }

    /// Store a version record
    ///
    /// # Errors
    /// - [`RegistryError::UnknownIdentity`] if the id was not issued here
    /// - [`RegistryError::DuplicateVersion`] if the `(identity, role)` slot
    ///   is already filled; the existing record is kept
    pub fn put_version(&self, version: ObjectVersion) -> Result<(), RegistryError> {
        let mut inner = self.inner.lock();
        let id = version.object_id;
        let uuid = match inner.identities.get(id.index()) {
            Some(identity) => identity.external_uuid.clone(),
            None => return Err(RegistryError::UnknownIdentity { id }),
        };

        let slots = inner.versions.entry(id).or_default();
        if slots.contains_key(&version.role) {
            return Err(RegistryError::DuplicateVersion {
                uuid,
                role: version.role,
            });
        }
        slots.insert(version.role, Arc::new(version));
        Ok(())
    }

    /// Find-or-create the identity for an extracted object and store its
    /// version under `role`
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateVersion`] if the package already
    /// contributed a version for this uuid.
    pub fn register(
        &self,
        role: PackageRole,
        object: ExtractedObject,
    ) -> Result<ObjectId, RegistryError> {
        let identity = self.find_or_create(&object.uuid, &object.name, object.object_type.clone());
        self.put_version(object.into_version(identity.id, role))?;
        Ok(identity.id)
    }

    /// Version of `id` in `role`, if the package contains it
    #[must_use]
    pub fn get_version(&self, id: ObjectId, role: PackageRole) -> Option<Arc<ObjectVersion>> {
        let inner = self.inner.lock();
        inner.versions.get(&id)?.get(&role).cloned()
    }

    /// All three role slots of `id`
    #[must_use]
    pub fn versions(&self, id: ObjectId) -> VersionSet {
        let inner = self.inner.lock();
        let Some(slots) = inner.versions.get(&id) else {
            return VersionSet::default();
        };
        VersionSet {
            base: slots.get(&PackageRole::Base).cloned(),
            customer: slots.get(&PackageRole::Customer).cloned(),
            new_vendor: slots.get(&PackageRole::NewVendor).cloned(),
        }
    }

    /// Identity by id
    #[must_use]
    pub fn identity(&self, id: ObjectId) -> Option<ObjectIdentity> {
        self.inner.lock().identities.get(id.index()).cloned()
    }

    /// Identity id by external uuid
    #[must_use]
    pub fn lookup(&self, uuid: &str) -> Option<ObjectId> {
        self.inner.lock().by_uuid.get(uuid).copied()
    }

    /// All identities in creation order
    #[must_use]
    pub fn identities(&self) -> Vec<ObjectIdentity> {
        self.inner.lock().identities.clone()
    }

    /// Number of identities
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().identities.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().identities.is_empty()
    }

    /// Number of stored versions in `role`
    #[must_use]
    pub fn version_count(&self, role: PackageRole) -> usize {
        self.inner
            .lock()
            .versions
            .values()
            .filter(|slots| slots.contains_key(&role))
            .count()
    }
}

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A second version was offered for an occupied `(identity, role)` slot.
    /// Points at a bug in the upstream extraction.
    #[error("duplicate {role} version for object {uuid}")]
    DuplicateVersion {
        /// External uuid of the identity
        uuid: String,
        /// Role whose slot was already filled
        role: PackageRole,
    },

    /// Version references an id this registry never issued
    #[error("unknown identity {id}")]
    UnknownIdentity {
        /// Offending id
        id: ObjectId,
    },
}
