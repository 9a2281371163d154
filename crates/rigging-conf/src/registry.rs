//! Symbol registry: the constructible targets a configuration may reference.
//!
//! `@name` references in configuration text resolve against a
//! [`SymbolRegistry`] populated by the host before loading. The registry is
//! an explicit object passed into the loader (no ambient global table), and
//! registration is validated eagerly, so a duplicate or empty name fails at
//! registration time rather than at first use.
//!
//! # Example registration
//!
//! ```ignore
//! let mut registry = SymbolRegistry::new();
//! registry.register(SymbolDescriptor {
//!     name: "Adam",
//!     signature: "Adam(learning_rate, beta1, beta2, eps)",
//!     doc: "Adam optimizer specification",
//!     category: "optimizer",
//!     factory: |args| {
//!         let lr = args.get_f64("learning_rate")?.unwrap_or(1e-3);
//!         Ok(Arc::new(AdamSpec { lr, ..Default::default() }))
//!     },
//! })?;
//! ```

use crate::store::{ParamError, TargetArgs};
use crate::value::Object;
use indexmap::IndexMap;
use thiserror::Error;

/// Constructor signature for registered symbols.
///
/// The factory receives a typed view of the parameters bound for its
/// `(scope, target)` site and returns the constructed object. Shape errors
/// surface here, at construction time.
pub type FactoryFn = fn(&TargetArgs) -> Result<Object, ParamError>;

/// Descriptor for one registered symbol.
#[derive(Debug, Clone)]
pub struct SymbolDescriptor {
    /// Name referenced from configuration text (e.g. `"Adam"`).
    pub name: &'static str,
    /// Full signature string, for listings and docs.
    pub signature: &'static str,
    /// Documentation string.
    pub doc: &'static str,
    /// Category tag (e.g. `"optimizer"`, `"network"`, `"environment"`).
    pub category: &'static str,
    /// The constructor.
    pub factory: FactoryFn,
}

/// Registration error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A symbol with this name is already registered.
    #[error("symbol '{0}' is already registered")]
    Duplicate(String),
    /// The descriptor has an empty name.
    #[error("symbol name cannot be empty")]
    EmptyName,
}

/// Name-indexed collection of symbol descriptors.
///
/// Iteration order is registration order, for deterministic listings.
#[derive(Debug, Clone, Default)]
pub struct SymbolRegistry {
    symbols: IndexMap<&'static str, SymbolDescriptor>,
}

impl SymbolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symbol, rejecting duplicates and empty names.
    pub fn register(&mut self, descriptor: SymbolDescriptor) -> Result<(), RegistryError> {
        if descriptor.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.symbols.contains_key(descriptor.name) {
            return Err(RegistryError::Duplicate(descriptor.name.to_string()));
        }
        self.symbols.insert(descriptor.name, descriptor);
        Ok(())
    }

    /// Look up a symbol by name.
    pub fn get(&self, name: &str) -> Option<&SymbolDescriptor> {
        self.symbols.get(name)
    }

    /// Whether a name is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// All registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.symbols.keys().copied()
    }

    /// All descriptors, in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &SymbolDescriptor> + '_ {
        self.symbols.values()
    }

    /// Number of registered symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
