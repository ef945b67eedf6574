//! # lazyns-base
//!
//! Core library for lazy symbol resolution and namespace binding over
//! native backing modules: a package exposes thousands of symbols spread
//! across independently loadable modules, and pays for a module only when
//! one of its symbols is first requested.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! host       → initialization orchestration, canonical publication
//!   ↓
//! namespace  → lazy/eager namespace objects, resolution failures
//!   ↓
//! registry   → module descriptors, symbol → candidate-modules index
//!   ↓
//! loader     → the backing-module load seam (trait + handle)
//!   ↓
//! base       → primitives (ModuleId)
//! ```
//!
//! The typical flow: build a [`registry::DescriptorRegistry`] from
//! externally produced descriptors, hand it to a
//! [`host::NamespaceInitializer`] together with a
//! [`loader::ModuleLoader`] implementation, and look the finished
//! namespace up through [`host::CanonicalNamespaces`]. Symbols are then
//! fetched with [`namespace::Namespace::resolve`].

/// Foundation types: ModuleId
pub mod base;

/// The backing-module load seam: ModuleLoader, ModuleHandle, LoadError
pub mod loader;

/// Module descriptors and the symbol index
pub mod registry;

/// Namespace objects: lazy resolution, eager population
pub mod namespace;

/// Initialization orchestration and canonical publication
pub mod host;

/// JSON descriptor interchange (optional)
#[cfg(feature = "interchange")]
pub mod interchange;

// Re-export commonly needed items
pub use base::ModuleId;
pub use host::{CanonicalNamespaces, ExtraSymbols, InitOptions, NamespaceInitializer};
pub use loader::{LoadError, ModuleHandle, ModuleLoader, SymbolValue};
pub use namespace::{Namespace, SymbolNotFound, SymbolTable};
pub use registry::{DescriptorRegistry, ModuleDescriptor, SymbolIndex, TemplateEntry};
