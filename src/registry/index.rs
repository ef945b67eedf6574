//! Symbol index construction — mapping symbols to candidate modules.
//!
//! The index is built once per initialization (or rebuild) from the full
//! descriptor registry and treated as immutable afterwards. For each
//! symbol it records every module that declares it, priority-ordered:
//! library-member declarations sit in front of non-member ones, and
//! registry iteration order breaks ties among equals.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::ModuleId;
use super::descriptor::{DescriptorRegistry, ModuleDescriptor};

// ============================================================================
// SYMBOL INDEX
// ============================================================================

/// Priority-ordered symbol → candidate-modules index.
///
/// `ModuleId`s are local to this index: they number the modules that were
/// fed to the builder, in feed order. The id → name table travels with the
/// index so candidate lists stay compact while diagnostics can still name
/// modules.
#[derive(Clone, Debug, Default)]
pub struct SymbolIndex {
    /// Module table: `ModuleId` → module name.
    modules: Vec<SmolStr>,
    /// Symbol → priority-ordered candidate modules.
    candidates: IndexMap<SmolStr, Vec<ModuleId>>,
}

impl SymbolIndex {
    /// An index with no modules and no symbols.
    ///
    /// This is what an eagerly-populated namespace carries: every lookup
    /// misses, so resolution never attempts a load.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the index over a whole registry, in registry order.
    pub fn build(registry: &DescriptorRegistry) -> Self {
        let mut builder = IndexBuilder::new();
        for (module, descriptor) in registry.iter() {
            builder.add_module(module.clone(), descriptor);
        }
        builder.build()
    }

    /// Build a single-module subset index.
    ///
    /// Used for the per-module namespaces attached to the root: such an
    /// index resolves only the symbols that one module declares itself.
    pub fn for_module(module: impl Into<SmolStr>, descriptor: &ModuleDescriptor) -> Self {
        let mut builder = IndexBuilder::new();
        builder.add_module(module.into(), descriptor);
        builder.build()
    }

    /// The candidate modules for a symbol, highest priority first.
    ///
    /// Empty slice if the symbol is not in the index.
    pub fn candidates(&self, symbol: &str) -> &[ModuleId] {
        self.candidates.get(symbol).map_or(&[], Vec::as_slice)
    }

    /// Check whether any module declares this symbol.
    pub fn contains(&self, symbol: &str) -> bool {
        self.candidates.contains_key(symbol)
    }

    /// The name of a module in this index's table.
    ///
    /// # Panics
    /// Panics if `id` did not come from this index.
    pub fn module_name(&self, id: ModuleId) -> &SmolStr {
        &self.modules[id.index() as usize]
    }

    /// Candidate module names for a symbol, highest priority first.
    pub fn candidate_names(&self, symbol: &str) -> impl Iterator<Item = &SmolStr> {
        self.candidates(symbol)
            .iter()
            .map(move |&id| self.module_name(id))
    }

    /// Iterate over all indexed symbols, in first-seen order.
    pub fn symbols(&self) -> impl Iterator<Item = &SmolStr> {
        self.candidates.keys()
    }

    /// Number of distinct symbols in the index.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Check if the index has no symbols.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of modules in the index's table.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for a [`SymbolIndex`].
///
/// Feed modules in priority order (registry order); `build` freezes the
/// result. Splitting construction from the finished index keeps the
/// front-insertion bookkeeping out of query paths.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    modules: Vec<SmolStr>,
    candidates: IndexMap<SmolStr, Vec<ModuleId>>,
}

impl IndexBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one module's declared symbols.
    ///
    /// Library-member template entries are front-inserted into their
    /// symbol's candidate list, so the most recently registered library
    /// member ends up first. Non-member entries and snake-case functions
    /// are appended in feed order.
    pub fn add_module(&mut self, module: SmolStr, descriptor: &ModuleDescriptor) -> ModuleId {
        let id = ModuleId::new(self.modules.len() as u32);
        self.modules.push(module);

        for entry in &descriptor.templates {
            let list = self.candidates.entry(entry.symbol.clone()).or_default();
            if entry.in_library {
                list.insert(0, id);
            } else {
                list.push(id);
            }
        }
        for function in &descriptor.snake_case_functions {
            self.candidates.entry(function.clone()).or_default().push(id);
        }

        id
    }

    /// Number of modules registered so far.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if no modules have been registered so far.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Freeze the builder into an immutable index.
    pub fn build(self) -> SymbolIndex {
        SymbolIndex {
            modules: self.modules,
            candidates: self.candidates,
        }
    }
}
