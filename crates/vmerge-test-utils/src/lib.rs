//! Testing utilities for the vendor merge workspace
//!
//! Package fixtures and a tracing subscriber for tests.

#![allow(missing_docs)]

use tracing_subscriber::EnvFilter;
use vmerge_object::{
    DependencyRef, ExtractedObject, ObjectRegistry, ObjectType, PackageRole, RegistryError,
    StructuralDetail,
};

/// Install a test-writer subscriber once per process
///
/// Honors `RUST_LOG`; defaults to `warn` so cycle breaks and caveats show
/// up in failing test output.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Builds the extracted contents of one package
#[derive(Debug, Clone, Default)]
pub struct PackageBuilder {
    objects: Vec<ExtractedObject>,
}

impl PackageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prebuilt record
    pub fn with(mut self, object: ExtractedObject) -> Self {
        self.objects.push(object);
        self
    }

    /// Object with one section of content
    pub fn object(
        self,
        uuid: &str,
        name: &str,
        object_type: ObjectType,
        section: &str,
        text: &str,
    ) -> Self {
        self.with(
            ExtractedObject::new(uuid, name, object_type)
                .with_detail(StructuralDetail::new().with_section(section, text)),
        )
    }

    pub fn rule(self, uuid: &str, name: &str, expression: &str) -> Self {
        self.object(uuid, name, ObjectType::ExpressionRule, "expression", expression)
    }

    pub fn interface(self, uuid: &str, name: &str, sail: &str) -> Self {
        self.object(uuid, name, ObjectType::Interface, "sail", sail)
    }

    /// Process model whose nodes reference `depends_on`
    pub fn process_model(self, uuid: &str, name: &str, nodes: &str, depends_on: &[&str]) -> Self {
        let object = depends_on.iter().fold(
            ExtractedObject::new(uuid, name, ObjectType::ProcessModel)
                .with_detail(StructuralDetail::new().with_section("nodes", nodes)),
            |obj, target| obj.with_dependency(DependencyRef::to(*target)),
        );
        self.with(object)
    }

    /// Set the version token on the most recently added object
    pub fn token(mut self, token: &str) -> Self {
        if let Some(last) = self.objects.last_mut() {
            last.version_token = Some(token.to_string());
        }
        self
    }

    /// Add a reference from the most recently added object
    pub fn depends_on(mut self, target: &str) -> Self {
        if let Some(last) = self.objects.last_mut() {
            last.dependency_references.push(DependencyRef::to(target));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn build(self) -> Vec<ExtractedObject> {
        self.objects
    }
}

/// Register three packages sequentially into a fresh registry
pub fn registry_from(
    base: PackageBuilder,
    customer: PackageBuilder,
    new_vendor: PackageBuilder,
) -> Result<ObjectRegistry, RegistryError> {
    let registry = ObjectRegistry::new();
    for (role, package) in [
        (PackageRole::Base, base),
        (PackageRole::Customer, customer),
        (PackageRole::NewVendor, new_vendor),
    ] {
        for object in package.build() {
            registry.register(role, object)?;
        }
    }
    Ok(registry)
}
