//! Top-level namespace initialization.
//!
//! Single pass, run-to-completion: pick the mode, build the root index
//! (or eagerly populate), inject the always-eager extras, build or
//! refresh the per-module sub-namespaces, then publish the finished
//! object in the canonical registry. On reload the same pass runs again
//! against the installed namespace, refreshing it in place so references
//! handed out earlier stay valid.

use std::sync::Arc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::debug;

use super::canonical::CanonicalNamespaces;
use crate::loader::{ModuleLoader, SymbolValue};
use crate::namespace::{EagerLoader, Namespace};
use crate::registry::{DescriptorRegistry, SymbolIndex};

/// Configuration supplied by the embedding application.
///
/// Where the values come from (env, config files) is the caller's
/// concern.
#[derive(Clone, Debug)]
pub struct InitOptions {
    /// Resolve symbols on demand (true) or load every module at startup.
    pub lazy_loading: bool,
    /// Package version string stamped onto the root namespace.
    pub version: SmolStr,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            lazy_loading: true,
            version: SmolStr::default(),
        }
    }
}

/// The always-eager extras: pre-resolved utility symbols injected
/// directly into the root namespace, never behind lazy resolution.
#[derive(Clone, Default)]
pub struct ExtraSymbols {
    symbols: IndexMap<SmolStr, SymbolValue>,
}

impl ExtraSymbols {
    /// Create an empty extras set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extra symbol.
    pub fn insert(&mut self, name: impl Into<SmolStr>, value: SymbolValue) {
        self.symbols.insert(name.into(), value);
    }

    /// Builder-style: add an extra symbol.
    pub fn with_symbol(mut self, name: impl Into<SmolStr>, value: SymbolValue) -> Self {
        self.insert(name, value);
        self
    }

    /// Iterate over (name, value) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &SymbolValue)> {
        self.symbols.iter()
    }

    /// Number of extra symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Orchestrates initialization and reload of a package namespace.
pub struct NamespaceInitializer {
    package: SmolStr,
    loader: Arc<dyn ModuleLoader>,
}

impl NamespaceInitializer {
    /// Create an initializer for a package.
    pub fn new(package: impl Into<SmolStr>, loader: Arc<dyn ModuleLoader>) -> Self {
        Self {
            package: package.into(),
            loader,
        }
    }

    /// Run the initialization pass and publish the result.
    ///
    /// Not designed for concurrent re-entry; call once at startup and
    /// once per explicit reload. Everything before the final install
    /// touches only the namespace objects being built.
    pub fn initialize(
        &self,
        registry: &DescriptorRegistry,
        options: &InitOptions,
        extras: &ExtraSymbols,
    ) -> Arc<Namespace> {
        debug!(
            package = %self.package,
            lazy = options.lazy_loading,
            modules = registry.len(),
            "initializing package namespace"
        );

        let canonical = CanonicalNamespaces::global();

        // Reload refreshes the installed object in place; identity is
        // preserved for holders of earlier references.
        let root = canonical.get(&self.package).unwrap_or_else(|| {
            Arc::new(Namespace::lazy(
                self.package.clone(),
                SymbolIndex::empty(),
                self.loader.clone(),
            ))
        });

        if options.lazy_loading {
            root.rebind(SymbolIndex::build(registry));
        } else {
            let (table, failures) = EagerLoader::new(&*self.loader).load_registry(registry);
            debug!(
                symbols = table.len(),
                failed_modules = failures.len(),
                "eager population complete"
            );
            root.rebind_eager(table);
        }

        // Extras go in regardless of mode: the lazy machinery may assume
        // they are synchronously available.
        for (name, value) in extras.iter() {
            root.insert_eager(name.clone(), value.clone());
        }
        root.set_version(options.version.clone());

        // One sub-namespace per module, scoped to that module's own
        // symbols; existing ones are refreshed, vanished ones dropped.
        let mut submodules = IndexMap::new();
        for (module, descriptor) in registry.iter() {
            let index = SymbolIndex::for_module(module.clone(), descriptor);
            let sub = match root.submodule(module) {
                Some(sub) => {
                    sub.rebind(index);
                    sub
                }
                None => Arc::new(Namespace::lazy(module.clone(), index, self.loader.clone())),
            };
            submodules.insert(module.clone(), sub);
        }
        root.set_submodules(submodules);

        // The only step touching process-wide state.
        canonical.install(self.package.clone(), root.clone());
        debug!(package = %self.package, "package namespace installed");

        root
    }
}
