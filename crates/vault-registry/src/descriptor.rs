use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};

/// A type or category together with its directly declared abstract categories.
///
/// The same shape describes both levels: a concrete state type declares the
/// categories it implements, and a category may itself extend further
/// categories. The resolver walks `extends` transitively.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Fully qualified type or category name.
    pub name: String,
    /// Directly declared abstract categories.
    pub extends: Vec<String>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, extends: Vec<String>) -> Self {
        Self {
            name: name.into(),
            extends,
        }
    }
}

/// The external type-metadata collaborator.
///
/// Given a type or category name, returns its declared category relations.
/// Failure is recoverable per type: the resolver excludes the failing type
/// and proceeds over the rest.
pub trait TypeDescriptorSource: Send + Sync {
    fn load(&self, name: &str) -> RegistryResult<TypeDescriptor>;
}

/// Map-backed descriptor source for tests and embedding.
///
/// Descriptors are registered up front with [`StaticDescriptorSource::with_type`];
/// anything not registered fails to load.
pub struct StaticDescriptorSource {
    descriptors: RwLock<HashMap<String, TypeDescriptor>>,
}

impl StaticDescriptorSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self {
            descriptors: RwLock::new(HashMap::new()),
        }
    }

    /// Register a type or category with its directly declared categories.
    pub fn with_type(self, name: &str, extends: &[&str]) -> Self {
        self.register(TypeDescriptor::new(
            name,
            extends.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Register a descriptor, replacing any previous one of the same name.
    pub fn register(&self, descriptor: TypeDescriptor) {
        self.descriptors
            .write()
            .expect("descriptor lock poisoned")
            .insert(descriptor.name.clone(), descriptor);
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.descriptors
            .read()
            .expect("descriptor lock poisoned")
            .len()
    }

    /// Returns `true` if no descriptors are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StaticDescriptorSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDescriptorSource for StaticDescriptorSource {
    fn load(&self, name: &str) -> RegistryResult<TypeDescriptor> {
        self.descriptors
            .read()
            .expect("descriptor lock poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownType(name.to_string()))
    }
}

impl std::fmt::Debug for StaticDescriptorSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticDescriptorSource")
            .field("descriptor_count", &self.len())
            .finish()
    }
}
